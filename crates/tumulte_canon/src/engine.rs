//! Script Analysis Engine.
//!
//! Owns the script host and the compiler. Every query takes the
//! [`ProgramScope`] it runs under; compiler errors are logged and surface as
//! "no result".

use tracing::{debug, warn};

use crate::compiler::{CompilerError, CompilerResult, ScriptCompiler};
use crate::host::{HostSettings, ScriptHost};
use crate::program::{Program, ProgramScope};
use crate::types::{CompletionInfo, DefinitionInfo, EmitOutput, MemberInfo, QuickInfo};

pub struct ScriptEngine {
    host: ScriptHost,
    compiler: Option<Box<dyn ScriptCompiler>>,
}

impl ScriptEngine {
    pub fn new(settings: HostSettings, compiler: Box<dyn ScriptCompiler>) -> Self {
        Self {
            host: ScriptHost::new(settings),
            compiler: Some(compiler),
        }
    }

    pub fn host(&self) -> &ScriptHost {
        &self.host
    }

    /// Create or update a script file. Returns its new version.
    pub fn update_document(&mut self, path: &str, text: impl Into<String>) -> u32 {
        let version = self.host.vfs_mut().update(path, text);
        debug!(path, version, "script updated");
        version
    }

    /// Remove a script file and its outgoing dependency edges.
    pub fn remove_document(&mut self, path: &str) -> bool {
        let removed = self.host.remove_file(path);
        if removed {
            debug!(path, "script removed");
        }
        removed
    }

    /// Overlay text of a script file.
    pub fn document_text(&self, path: &str) -> Option<&str> {
        self.host.vfs().overlay_text(path)
    }

    /// Every script that directly or transitively depends on `path`.
    pub fn scripts_dependant_of(&self, path: &str, include_self: bool) -> Vec<String> {
        self.host.graph().dependants_of(path, include_self)
    }

    /// A scope whose roots are `roots` plus everything they transitively
    /// depend on.
    pub fn restrict_program_to_scripts<S: AsRef<str>>(&self, roots: &[S]) -> ProgramScope {
        let roots: Vec<String> = roots.iter().map(|r| r.as_ref().to_string()).collect();
        ProgramScope::Restricted(self.host.graph().dependency_closure(&roots))
    }

    /// The unrestricted scope.
    pub fn clear_program_restriction(&self) -> ProgramScope {
        ProgramScope::Unrestricted
    }

    pub fn root_file_names(&mut self, scope: &ProgramScope) -> Vec<String> {
        Program::new(&mut self.host, scope).root_file_names()
    }

    pub fn completions_at(
        &mut self,
        scope: &ProgramScope,
        path: &str,
        offset: u32,
    ) -> Option<CompletionInfo> {
        self.call(scope, "completions", path, |compiler, program| {
            compiler.completions_at(program, path, offset)
        })
        .flatten()
    }

    pub fn quick_info_at(
        &mut self,
        scope: &ProgramScope,
        path: &str,
        offset: u32,
    ) -> Option<QuickInfo> {
        self.call(scope, "quick info", path, |compiler, program| {
            compiler.quick_info_at(program, path, offset)
        })
        .flatten()
    }

    /// Definitions of the symbol at `offset`, falling back to its type's
    /// definitions when the symbol itself has none.
    pub fn definitions_at(
        &mut self,
        scope: &ProgramScope,
        path: &str,
        offset: u32,
    ) -> Vec<DefinitionInfo> {
        let definitions = self
            .call(scope, "definitions", path, |compiler, program| {
                compiler.definitions_at(program, path, offset)
            })
            .unwrap_or_default();
        if !definitions.is_empty() {
            return definitions;
        }

        self.call(scope, "type definitions", path, |compiler, program| {
            compiler.type_definitions_at(program, path, offset)
        })
        .unwrap_or_default()
    }

    pub fn emit_declaration(&mut self, scope: &ProgramScope, path: &str) -> Option<EmitOutput> {
        self.call(scope, "declaration emit", path, |compiler, program| {
            compiler.emit_declaration(program, path)
        })
    }

    pub fn default_export_members(
        &mut self,
        scope: &ProgramScope,
        path: &str,
    ) -> Option<Vec<MemberInfo>> {
        self.call(scope, "default export members", path, |compiler, program| {
            compiler.default_export_members(program, path)
        })
    }

    pub fn resolve_defining_file(
        &mut self,
        scope: &ProgramScope,
        path: &str,
        component_key: &str,
    ) -> Option<String> {
        self.call(scope, "defining file", path, |compiler, program| {
            compiler.resolve_defining_file(program, path, component_key)
        })
        .flatten()
    }

    pub fn is_disposed(&self) -> bool {
        self.compiler.is_none()
    }

    /// Release the compiler and forget every file and edge.
    pub fn dispose(&mut self) {
        if let Some(mut compiler) = self.compiler.take() {
            compiler.dispose();
        }
        self.host.clear();
    }

    fn call<T>(
        &mut self,
        scope: &ProgramScope,
        what: &'static str,
        path: &str,
        f: impl FnOnce(&mut Box<dyn ScriptCompiler>, &mut Program<'_>) -> CompilerResult<T>,
    ) -> Option<T> {
        let Some(compiler) = self.compiler.as_mut() else {
            debug!(path, "{what} skipped: {}", CompilerError::Disposed);
            return None;
        };

        let mut program = Program::new(&mut self.host, scope);
        match f(compiler, &mut program) {
            Ok(value) => Some(value),
            Err(err @ CompilerError::Unsupported(_)) => {
                debug!(path, "{what}: {err}");
                None
            }
            Err(err) => {
                warn!(path, restricted = scope.is_restricted(), "{what} failed: {err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::types::{CompletionEntry, ScriptElementKind, TextSpan};

    #[derive(Default)]
    struct Log {
        roots: Vec<Vec<String>>,
        disposed: bool,
    }

    /// Resolves `from '<specifier>'` imports of every file it touches and
    /// records the roots it was handed.
    struct FakeCompiler {
        log: Rc<RefCell<Log>>,
    }

    fn imports_of(text: &str) -> Vec<String> {
        text.split("from '")
            .skip(1)
            .filter_map(|rest| rest.split('\'').next())
            .map(str::to_string)
            .collect()
    }

    impl FakeCompiler {
        fn load(&self, program: &mut Program<'_>, path: &str) {
            let mut pending = vec![path.to_string()];
            let mut seen = Vec::new();
            while let Some(file) = pending.pop() {
                if seen.contains(&file) {
                    continue;
                }
                seen.push(file.clone());
                let text = program.read_file(&file).unwrap_or_default();
                let resolved = program.resolve_module_names(&file, &imports_of(&text));
                pending.extend(resolved.into_iter().flatten().map(|m| m.resolved_file_name));
            }
        }
    }

    impl ScriptCompiler for FakeCompiler {
        fn completions_at(
            &mut self,
            program: &mut Program<'_>,
            path: &str,
            offset: u32,
        ) -> CompilerResult<Option<CompletionInfo>> {
            let text = program
                .read_file(path)
                .ok_or_else(|| CompilerError::MissingFile(path.to_string()))?;
            if offset as usize > text.len() {
                return Err(CompilerError::OffsetOutOfRange {
                    path: path.to_string(),
                    offset,
                });
            }
            Ok(Some(CompletionInfo {
                entries: vec![CompletionEntry::new("length", ScriptElementKind::Property)],
                ..Default::default()
            }))
        }

        fn quick_info_at(
            &mut self,
            _program: &mut Program<'_>,
            _path: &str,
            _offset: u32,
        ) -> CompilerResult<Option<QuickInfo>> {
            Err(CompilerError::Internal("boom".into()))
        }

        fn definitions_at(
            &mut self,
            _program: &mut Program<'_>,
            _path: &str,
            _offset: u32,
        ) -> CompilerResult<Vec<DefinitionInfo>> {
            Ok(Vec::new())
        }

        fn type_definitions_at(
            &mut self,
            _program: &mut Program<'_>,
            path: &str,
            _offset: u32,
        ) -> CompilerResult<Vec<DefinitionInfo>> {
            Ok(vec![DefinitionInfo {
                file_name: path.to_string(),
                text_span: TextSpan::new(0, 4),
                kind: ScriptElementKind::Interface,
                name: "Todo".into(),
            }])
        }

        fn emit_declaration(
            &mut self,
            program: &mut Program<'_>,
            path: &str,
        ) -> CompilerResult<EmitOutput> {
            self.log.borrow_mut().roots.push(program.root_file_names());
            self.load(program, path);
            Ok(EmitOutput::declaration("export {};"))
        }

        fn dispose(&mut self) {
            self.log.borrow_mut().disposed = true;
        }
    }

    fn engine() -> (ScriptEngine, Rc<RefCell<Log>>) {
        let log = Rc::new(RefCell::new(Log::default()));
        let compiler = FakeCompiler { log: log.clone() };
        let mut engine = ScriptEngine::new(HostSettings::default(), Box::new(compiler));
        engine.update_document("/w/a.ts", "import { b } from './b';");
        engine.update_document("/w/b.ts", "import { c } from './c';");
        engine.update_document("/w/c.ts", "export const c = 1;");
        engine.update_document("/w/other.ts", "export const o = 1;");
        (engine, log)
    }

    #[test]
    fn test_emit_records_dependencies() {
        let (mut engine, _) = engine();
        let scope = engine.clear_program_restriction();
        assert!(engine.emit_declaration(&scope, "/w/a.ts").is_some());

        assert_eq!(engine.scripts_dependant_of("/w/c.ts", false), vec!["/w/b.ts", "/w/a.ts"]);
        assert_eq!(
            engine.scripts_dependant_of("/w/c.ts", true),
            vec!["/w/c.ts", "/w/b.ts", "/w/a.ts"]
        );
    }

    #[test]
    fn test_restriction_and_restoration() {
        let (mut engine, log) = engine();
        let unrestricted = engine.clear_program_restriction();
        engine.emit_declaration(&unrestricted, "/w/a.ts");
        let before = engine.root_file_names(&unrestricted);

        let restricted = engine.restrict_program_to_scripts(&["/w/a.ts", "/w/a.ts.d.ts"]);
        assert_eq!(
            engine.root_file_names(&restricted),
            vec!["/w/a.ts", "/w/a.ts.d.ts", "/w/b.ts", "/w/c.ts"]
        );
        engine.emit_declaration(&restricted, "/w/a.ts");
        assert_eq!(
            log.borrow().roots.last().unwrap(),
            &vec!["/w/a.ts", "/w/a.ts.d.ts", "/w/b.ts", "/w/c.ts"]
        );

        let cleared = engine.clear_program_restriction();
        assert_eq!(engine.root_file_names(&cleared), before);
        assert_eq!(before, vec!["/w/a.ts", "/w/b.ts", "/w/c.ts", "/w/other.ts"]);
    }

    #[test]
    fn test_compiler_errors_degrade_to_none() {
        let (mut engine, _) = engine();
        let scope = ProgramScope::Unrestricted;

        assert!(engine.completions_at(&scope, "/w/a.ts", 3).is_some());
        assert!(engine.completions_at(&scope, "/w/a.ts", 10_000).is_none());
        assert!(engine.completions_at(&scope, "/w/nope.ts", 0).is_none());
        assert!(engine.quick_info_at(&scope, "/w/a.ts", 3).is_none());
        assert!(engine.default_export_members(&scope, "/w/a.ts").is_none());
        assert!(engine.resolve_defining_file(&scope, "/w/a.ts", "child").is_none());
    }

    #[test]
    fn test_definitions_fall_back_to_type_definitions() {
        let (mut engine, _) = engine();
        let definitions = engine.definitions_at(&ProgramScope::Unrestricted, "/w/a.ts", 3);

        assert_eq!(definitions.len(), 1);
        assert_eq!(definitions[0].name, "Todo");
    }

    #[test]
    fn test_remove_document_drops_edges() {
        let (mut engine, _) = engine();
        engine.emit_declaration(&ProgramScope::Unrestricted, "/w/a.ts");

        assert!(engine.remove_document("/w/b.ts"));
        assert_eq!(engine.scripts_dependant_of("/w/c.ts", false), Vec::<String>::new());
        assert_eq!(engine.document_text("/w/b.ts"), None);
    }

    #[test]
    fn test_dispose() {
        let (mut engine, log) = engine();
        engine.dispose();

        assert!(log.borrow().disposed);
        assert!(engine.is_disposed());
        assert!(engine.host().vfs().is_empty());
        assert!(engine
            .completions_at(&ProgramScope::Unrestricted, "/w/a.ts", 0)
            .is_none());
    }
}

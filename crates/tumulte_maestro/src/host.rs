//! The analysis host.
//!
//! One [`AnalysisHost`] owns every registry: the script engine (virtual
//! files, dependency graph, compiler), the component documents and the
//! collaborators. Operations take `&mut self` and run to completion one at
//! a time.

use lsp_types::{CompletionList, Hover, LocationLink};
use tracing::{debug, warn};
use tumulte_canon::{MemberInfo, ProgramScope, ScriptCompiler, ScriptEngine};
use tumulte_carton::{
    declaration_path, dirname, join_path, normalize_path, strip_declaration_suffix, Fingerprint,
    FxHashSet,
};

use crate::classifier::{self, expression_at, ContentType};
use crate::compiler::{CompiledOutput, ComponentCompiler};
use crate::config::HostConfig;
use crate::declaration::{
    emit_internal_declaration, to_external_declaration, DeclarationKind,
    DEFAULT_COMPONENT_DECLARATION,
};
use crate::document::{ComponentDocument, DiskTextSource, DocumentStore, TextSource};
use crate::expression_scope::{ExpressionScope, ScopeProperty};
use crate::ide::{
    from_lsp_position, to_lsp_range, CompletionService, DefinitionService, HoverService,
    QueryTarget,
};
use crate::imports::component_imports;
use crate::markup::{MarkupLanguageService, NoopMarkupService};
use crate::slots::default_slot_props;

/// Embedded-script analysis host for component files.
pub struct AnalysisHost {
    config: HostConfig,
    engine: ScriptEngine,
    documents: DocumentStore,
    component_compiler: Option<Box<dyn ComponentCompiler>>,
    markup: Box<dyn MarkupLanguageService>,
    text_source: Box<dyn TextSource>,
}

impl AnalysisHost {
    pub fn new(config: HostConfig, compiler: Box<dyn ScriptCompiler>) -> Self {
        let engine = ScriptEngine::new(config.host_settings(), compiler);
        Self {
            config,
            engine,
            documents: DocumentStore::new(),
            component_compiler: None,
            markup: Box::new(NoopMarkupService),
            text_source: Box::new(DiskTextSource),
        }
    }

    pub fn with_component_compiler(mut self, compiler: Box<dyn ComponentCompiler>) -> Self {
        self.component_compiler = Some(compiler);
        self
    }

    pub fn with_markup_service(mut self, markup: Box<dyn MarkupLanguageService>) -> Self {
        self.markup = markup;
        self
    }

    /// Where to read components that are referenced but not open.
    pub fn with_text_source(mut self, source: Box<dyn TextSource>) -> Self {
        self.text_source = source;
        self
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub fn engine(&self) -> &ScriptEngine {
        &self.engine
    }

    pub(crate) fn engine_mut(&mut self) -> &mut ScriptEngine {
        &mut self.engine
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    pub fn document(&self, path: &str) -> Option<&ComponentDocument> {
        self.documents.get(&normalize_path(path))
    }

    /// Declaration of components without a usable script.
    pub fn default_declaration(&self) -> &str {
        self.config
            .default_declaration
            .as_deref()
            .unwrap_or(DEFAULT_COMPONENT_DECLARATION)
    }

    // =========================================================================
    // Document lifecycle
    // =========================================================================

    /// Replace the text of a component and re-parse it.
    ///
    /// Every component that depends on this one, or on its declaration file,
    /// loses its derived artifacts, and the component's expression scope
    /// files are dropped. `None` when the text does not parse; the
    /// component is then forgotten.
    pub fn update_document(
        &mut self,
        path: &str,
        text: impl Into<String>,
    ) -> Option<&ComponentDocument> {
        let path = normalize_path(path);
        let text = text.into();

        self.invalidate_dependants(&path);
        self.remove_expression_scopes(&path);
        self.engine.remove_document(&declaration_path(&path));

        let tree = match tumulte_armature::parse(&text) {
            Ok(tree) => tree,
            Err(err) => {
                warn!(path = %path, "component does not parse: {err}");
                self.documents.remove(&path);
                self.engine.remove_document(&path);
                return None;
            }
        };

        match tree.script_text() {
            Some(script) => {
                self.engine.update_document(&path, script);
            }
            None => {
                self.engine.remove_document(&path);
            }
        }
        self.documents
            .insert(ComponentDocument::new(path.clone(), text, tree));
        self.documents.get(&path)
    }

    /// Forget a component, its script, its declaration file and its
    /// expression scopes.
    pub fn remove_document(&mut self, path: &str) -> bool {
        let path = normalize_path(path);
        self.invalidate_dependants(&path);
        self.remove_expression_scopes(&path);
        self.engine.remove_document(&declaration_path(&path));
        self.engine.remove_document(&path);
        self.documents.remove(&path).is_some()
    }

    /// The open component at `path`, loading it through the text source
    /// when it is not open yet.
    pub fn touch(&mut self, path: &str) -> Option<&ComponentDocument> {
        let path = normalize_path(path);
        if !self.documents.contains(&path) {
            let Some(text) = self.text_source.read(&path) else {
                debug!(path = %path, "component text unavailable");
                return None;
            };
            return self.update_document(&path, text);
        }
        self.documents.get(&path)
    }

    /// Drop the scope files of every expression of `path`. Their keys carry
    /// the expression start, so an edit would otherwise leave them behind.
    fn remove_expression_scopes(&mut self, path: &str) {
        let scope_prefix = format!("{path}#expression:");
        for scope in self
            .engine
            .host()
            .vfs()
            .paths()
            .into_iter()
            .filter(|key| key.starts_with(&scope_prefix))
        {
            self.engine.remove_document(&scope);
        }
    }

    fn invalidate_dependants(&mut self, path: &str) {
        let mut dependants = self.engine.scripts_dependant_of(path, false);
        dependants.extend(
            self.engine
                .scripts_dependant_of(&declaration_path(path), false),
        );

        for dependant in dependants {
            if let Some(document) = self.documents.get_mut(&dependant) {
                if document.has_derived() {
                    debug!(path, dependant = %dependant, "derived artifacts invalidated");
                }
                document.clear_derived();
            }
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Byte offset of an editor position in an open component.
    pub fn offset_at(&self, path: &str, position: lsp_types::Position) -> Option<u32> {
        self.document(path)?
            .line_index()
            .offset_of(from_lsp_position(position))
    }

    pub fn classify(&self, path: &str, offset: u32) -> Option<ContentType> {
        let document = self.document(path)?;
        classifier::classify(document.tree(), offset)
    }

    pub fn completions(&mut self, path: &str, offset: u32) -> Option<CompletionList> {
        let path = normalize_path(path);
        match self.classify(&path, offset)? {
            ContentType::Template => {
                let document = self.documents.get(&path)?;
                let items = self.markup.template_completions(document, offset);
                Some(CompletionService::list(items))
            }
            ContentType::Style => {
                let document = self.documents.get(&path)?;
                let items = self.markup.style_completions(document, offset);
                Some(CompletionService::list(items))
            }
            ContentType::Script | ContentType::Expression => {
                let target = self.query_target(&path, offset)?;
                let target_offset = target.to_target_offset(offset)?;
                self.engine
                    .completions_at(&ProgramScope::Unrestricted, target.file_key(&path), target_offset)
                    .map(CompletionService::convert)
            }
        }
    }

    pub fn hover(&mut self, path: &str, offset: u32) -> Option<Hover> {
        let path = normalize_path(path);
        let target = self.query_target(&path, offset)?;
        let target_offset = target.to_target_offset(offset)?;
        let info = self.engine.quick_info_at(
            &ProgramScope::Unrestricted,
            target.file_key(&path),
            target_offset,
        )?;

        let document = self.documents.get(&path)?;
        let range = target
            .to_document_offset(info.text_span.start)
            .zip(target.to_document_offset(info.text_span.end()))
            .and_then(|(start, end)| document.line_index().range_of(start, end))
            .map(to_lsp_range);
        Some(HoverService::from_quick_info(&info, range))
    }

    pub fn definitions(&mut self, path: &str, offset: u32) -> Vec<LocationLink> {
        let path = normalize_path(path);
        let Some(target) = self.query_target(&path, offset) else {
            return Vec::new();
        };
        let Some(target_offset) = target.to_target_offset(offset) else {
            return Vec::new();
        };
        let definitions = self.engine.definitions_at(
            &ProgramScope::Unrestricted,
            target.file_key(&path),
            target_offset,
        );

        let Some(document) = self.documents.get(&path) else {
            return Vec::new();
        };
        DefinitionService::location_links(
            document,
            &target,
            &definitions,
            &self.documents,
            self.engine.host().vfs(),
        )
    }

    /// Declaration of a component, as seen from inside or by importers.
    pub fn component_declaration(&mut self, path: &str, kind: DeclarationKind) -> Option<String> {
        let path = normalize_path(path);
        self.touch(&path)?;
        self.prepare(&path);
        match kind {
            DeclarationKind::Internal => self.internal_declaration(&path),
            DeclarationKind::External => self.external_declaration(&path),
        }
    }

    /// Compiled form of a component, memoized until its next update.
    pub fn compiled_output(&mut self, path: &str) -> Option<CompiledOutput> {
        let path = normalize_path(path);
        if let Some(output) = self.touch(&path)?.compiled_output() {
            return Some(output.clone());
        }

        let Some(compiler) = self.component_compiler.as_mut() else {
            debug!(path = %path, "no component compiler");
            return None;
        };
        let document = self.documents.get(&path)?;
        match compiler.compile(&path, document.text()) {
            Ok(output) => {
                self.documents
                    .get_mut(&path)?
                    .set_compiled_output(output.clone());
                Some(output)
            }
            Err(err) => {
                warn!(path = %path, "component compilation failed: {err}");
                None
            }
        }
    }

    /// Release the compiler and forget everything.
    pub fn dispose(&mut self) {
        self.engine.dispose();
        self.documents.clear();
        self.component_compiler = None;
    }

    // =========================================================================
    // Script targets
    // =========================================================================

    /// The script file a request at `offset` is answered from, with the
    /// declarations it needs materialized.
    pub(crate) fn query_target(&mut self, path: &str, offset: u32) -> Option<QueryTarget> {
        match self.classify(path, offset)? {
            ContentType::Script => {
                let script_start = self.documents.get(path)?.script_start()?;
                self.prepare(path);
                Some(QueryTarget::Script { script_start })
            }
            ContentType::Expression => {
                self.prepare(path);
                let scope = self.expression_scope(path, offset)?;
                let current = self.engine.document_text(&scope.key).map(Fingerprint::of);
                if current != Some(Fingerprint::of(&scope.text)) {
                    self.engine.update_document(&scope.key, scope.text.clone());
                }
                Some(QueryTarget::Expression(scope))
            }
            ContentType::Template | ContentType::Style => None,
        }
    }

    /// Scope function of the expression holding `offset`.
    fn expression_scope(&mut self, path: &str, offset: u32) -> Option<ExpressionScope> {
        let document = self.documents.get(path)?;
        let expression = expression_at(document.tree(), offset)?.clone();
        let enclosing_components: Vec<String> = document
            .tree()
            .element_path_at(offset)
            .into_iter()
            .skip(1)
            .filter(|element| element.is_custom)
            .map(|element| element.tag.to_string())
            .collect();

        let mut properties: Vec<ScopeProperty> = self
            .component_members(path)
            .unwrap_or_default()
            .iter()
            .map(ScopeProperty::from_member)
            .collect();
        for tag in &enclosing_components {
            properties.extend(self.slot_properties(path, tag));
        }

        Some(ExpressionScope::build(path, &expression, &properties))
    }

    fn component_members(&mut self, path: &str) -> Option<Vec<MemberInfo>> {
        if let Some(members) = self.documents.get(path)?.members() {
            return Some(members.to_vec());
        }
        let members = self
            .engine
            .default_export_members(&ProgramScope::Unrestricted, path)?;
        self.documents.get_mut(path)?.set_members(members.clone());
        Some(members)
    }

    /// Props of the default slot of the component registered as `tag`.
    fn slot_properties(&mut self, path: &str, tag: &str) -> Vec<ScopeProperty> {
        let Some(defining_file) =
            self.engine
                .resolve_defining_file(&ProgramScope::Unrestricted, path, tag)
        else {
            return Vec::new();
        };
        let component = strip_declaration_suffix(&normalize_path(&defining_file)).to_string();
        if !self.config.is_component_path(&component) {
            debug!(path, tag, defining_file = %component, "not a component file");
            return Vec::new();
        }

        match self.touch(&component) {
            Some(document) => default_slot_props(document.tree())
                .into_iter()
                .map(ScopeProperty::untyped)
                .collect(),
            None => Vec::new(),
        }
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn prepare(&mut self, path: &str) {
        if self.config.materialize_declarations {
            let mut visiting = FxHashSet::default();
            self.materialize_declarations(path, &mut visiting);
        }
    }

    /// Write `<child>.d.ts` for every component imported by `path`,
    /// recursively.
    fn materialize_declarations(&mut self, path: &str, visiting: &mut FxHashSet<String>) {
        if !visiting.insert(path.to_string()) {
            return;
        }
        let Some(script) = self
            .documents
            .get(path)
            .and_then(|document| document.tree().script_text())
        else {
            return;
        };
        let imports = component_imports(script, &self.config.component_extension);

        for specifier in imports {
            let child = join_path(dirname(path), &specifier);
            if self.touch(&child).is_none() {
                debug!(path, child = %child, "imported component unavailable");
                continue;
            }
            self.materialize_declarations(&child, visiting);
            if let Some(declaration) = self.external_declaration(&child) {
                self.write_declaration(&child, declaration);
            }
        }
    }

    fn write_declaration(&mut self, component: &str, declaration: String) {
        let path = declaration_path(component);
        let fingerprint = Fingerprint::of(&declaration);
        let unchanged = self
            .engine
            .document_text(&path)
            .is_some_and(|current| Fingerprint::of(current) == fingerprint);
        if unchanged {
            return;
        }

        let version = self.engine.update_document(&path, declaration);
        debug!(path = %path, version, fingerprint = %fingerprint.to_hex(), "declaration materialized");
        for dependant in self.engine.scripts_dependant_of(&path, false) {
            if let Some(document) = self.documents.get_mut(&dependant) {
                document.clear_derived();
            }
        }
    }

    fn internal_declaration(&mut self, path: &str) -> Option<String> {
        let document = self.documents.get(path)?;
        if let Some(declaration) = document.internal_declaration() {
            return Some(declaration.to_string());
        }

        let emitted = if document.tree().script_text().is_some() {
            emit_internal_declaration(&mut self.engine, path)
        } else {
            None
        };
        let declaration = emitted.unwrap_or_else(|| self.default_declaration().to_string());
        self.documents
            .get_mut(path)?
            .set_internal_declaration(declaration.clone());
        Some(declaration)
    }

    fn external_declaration(&mut self, path: &str) -> Option<String> {
        if let Some(declaration) = self.documents.get(path)?.external_declaration() {
            return declaration.map(str::to_string);
        }

        let internal = self.internal_declaration(path)?;
        let external = if internal == self.default_declaration() {
            Some(internal)
        } else {
            to_external_declaration(&internal)
        };
        if external.is_none() {
            debug!(path, "internal declaration has no wrappable default export");
        }
        self.documents
            .get_mut(path)?
            .set_external_declaration(external.clone());
        external
    }
}

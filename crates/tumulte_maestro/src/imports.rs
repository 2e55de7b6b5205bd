//! Component imports of a script.

use oxc_allocator::Allocator;
use oxc_ast::ast::Statement;
use oxc_parser::Parser;
use oxc_span::SourceType;

/// Relative module specifiers ending in `extension` that `script` imports
/// or re-exports, in source order, without duplicates.
pub fn component_imports(script: &str, extension: &str) -> Vec<String> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, script, SourceType::ts()).parse();

    let mut specifiers: Vec<String> = Vec::new();
    for stmt in &ret.program.body {
        let source = match stmt {
            Statement::ImportDeclaration(decl) => Some(&decl.source),
            Statement::ExportNamedDeclaration(decl) => decl.source.as_ref(),
            Statement::ExportAllDeclaration(decl) => Some(&decl.source),
            _ => None,
        };
        let Some(source) = source else { continue };

        let specifier = source.value.as_str();
        if is_relative(specifier)
            && specifier.ends_with(extension)
            && !specifiers.iter().any(|seen| seen == specifier)
        {
            specifiers.push(specifier.to_string());
        }
    }
    specifiers
}

fn is_relative(specifier: &str) -> bool {
    specifier.starts_with("./") || specifier.starts_with("../") || specifier.starts_with('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_imports() {
        let script = r#"
import Child from "./child.riot";
import { helper } from "../lib/helper";
import Shared from "shared-ui/button.riot";
export { default as Row } from "./row.riot";
export * from "./child.riot";
import Again from './child.riot';

export default {
    components: { Child }
}
"#;
        assert_eq!(
            component_imports(script, ".riot"),
            vec!["./child.riot", "./row.riot"]
        );
    }

    #[test]
    fn test_extension_is_configurable() {
        let script = "import Child from './child.tag';\nimport Other from './other.riot';";
        assert_eq!(component_imports(script, ".tag"), vec!["./child.tag"]);
    }
}

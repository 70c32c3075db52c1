//! URL template resolution.
//!
//! Button URLs authored with the template-text variant carry
//! `{placeholder}` tokens filled in from the runtime context at render
//! time. The recognized set is fixed: a template naming none of the
//! recognized tokens is invalid and resolves to the empty string, so a
//! bad template produces a dead link rather than a broken one.

use placard_types::RuntimeContext;

/// Default recognized placeholders: token in the template mapped to
/// the context key supplying its value.
const DEFAULT_PLACEHOLDERS: &[(&str, &str)] = &[
    ("{experienceLink}", "experienceLink"),
    ("{programId}", "programId"),
];

/// Resolves `{placeholder}` tokens against the runtime context.
#[derive(Debug, Clone)]
pub struct TemplateResolver {
    /// (token, context key) pairs
    placeholders: Vec<(String, String)>,
}

impl Default for TemplateResolver {
    fn default() -> Self {
        Self::with_placeholders(
            DEFAULT_PLACEHOLDERS
                .iter()
                .map(|(token, key)| (token.to_string(), key.to_string())),
        )
    }
}

impl TemplateResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// A resolver with a custom recognized set.
    pub fn with_placeholders(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            placeholders: pairs.into_iter().collect(),
        }
    }

    /// Resolve a template against the context.
    ///
    /// All occurrences of every recognized token are replaced in one
    /// pass over the template, so substituted values are never
    /// re-scanned for tokens. A value absent from the context
    /// substitutes as the empty string (the token still counts as
    /// recognized). Unrecognized `{...}` tokens stay literal. A
    /// template containing no recognized token at all resolves to the
    /// empty string.
    pub fn resolve(&self, template: &str, ctx: &RuntimeContext) -> String {
        let recognized = self
            .placeholders
            .iter()
            .any(|(token, _)| template.contains(token.as_str()));
        if !recognized {
            tracing::warn!(template, "template names no recognized placeholder");
            return String::new();
        }

        let mut resolved = String::with_capacity(template.len());
        let mut rest = template;
        while !rest.is_empty() {
            let next = self
                .placeholders
                .iter()
                .filter_map(|(token, key)| rest.find(token.as_str()).map(|at| (at, token, key)))
                .min_by_key(|(at, ..)| *at);
            let Some((at, token, key)) = next else {
                resolved.push_str(rest);
                break;
            };
            resolved.push_str(&rest[..at]);
            if let Some(value) = ctx.get_str(key) {
                resolved.push_str(&value);
            }
            rest = &rest[at + token.len()..];
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(pairs: &[(&str, &str)]) -> RuntimeContext {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_single_token_resolution() {
        let resolver = TemplateResolver::new();
        let c = ctx(&[("experienceLink", "https://host")]);
        assert_eq!(resolver.resolve("{experienceLink}/x", &c), "https://host/x");
    }

    #[test]
    fn test_all_occurrences_replaced() {
        let resolver = TemplateResolver::new();
        let c = ctx(&[("programId", "p42")]);
        assert_eq!(
            resolver.resolve("/p/{programId}/x/{programId}", &c),
            "/p/p42/x/p42"
        );
    }

    #[test]
    fn test_absent_value_substitutes_empty() {
        let resolver = TemplateResolver::new();
        // Token recognized, value missing: substitution happens, empty
        assert_eq!(
            resolver.resolve("{experienceLink}/home", &ctx(&[])),
            "/home"
        );
    }

    #[test]
    fn test_substituted_value_is_not_rescanned() {
        let resolver = TemplateResolver::new();
        // A value that spells a recognized token must land literally
        let c = ctx(&[("experienceLink", "{programId}"), ("programId", "p42")]);
        assert_eq!(resolver.resolve("{experienceLink}/x", &c), "{programId}/x");
    }

    #[test]
    fn test_no_recognized_token_is_invalid() {
        let resolver = TemplateResolver::new();
        let c = ctx(&[("experienceLink", "https://host")]);
        assert_eq!(resolver.resolve("https://static.example.com", &c), "");
        assert_eq!(resolver.resolve("{unknownToken}/x", &c), "");
    }

    #[test]
    fn test_idempotent_on_unrecognized_input() {
        let resolver = TemplateResolver::new();
        let c = ctx(&[]);
        let once = resolver.resolve("{unknownToken}/x", &c);
        assert_eq!(once, "");
        assert_eq!(resolver.resolve(&once, &c), "");
    }

    #[test]
    fn test_unrecognized_token_stays_literal_alongside_recognized() {
        let resolver = TemplateResolver::new();
        let c = ctx(&[("experienceLink", "https://host")]);
        assert_eq!(
            resolver.resolve("{experienceLink}/x/{notAThing}", &c),
            "https://host/x/{notAThing}"
        );
    }

    #[test]
    fn test_custom_placeholder_set() {
        let resolver = TemplateResolver::with_placeholders([(
            "{tenant}".to_string(),
            "tenantId".to_string(),
        )]);
        let c = ctx(&[("tenantId", "acme")]);
        assert_eq!(resolver.resolve("/t/{tenant}", &c), "/t/acme");
        // Default tokens are not recognized by a custom set
        assert_eq!(resolver.resolve("{experienceLink}/x", &c), "");
    }
}

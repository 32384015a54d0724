//! Text transformations applied to file contents.

pub mod declaration;
pub mod rule;

pub use declaration::{DeclarationInjector, Injection};
pub use rule::Rule;

use crate::error::{RestyleError, Result};

/// An ordered list of rules.
///
/// Each rule runs on the output of the previous one, so a rule may match text
/// an earlier rule introduced. Put the most specific pattern first: a rule for
/// `const Color(0xFF...)` must come before the rule for the bare
/// `Color(0xFF...)`, or the bare rule eats the inner text and leaves `const`
/// stranded.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Creates an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule.
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Appends a regex rule.
    pub fn replace_pattern(self, pattern: &str, replacement: &str) -> Result<Self> {
        Ok(self.rule(Rule::pattern(pattern, replacement)?))
    }

    /// Appends a word-boundary anchored token rule.
    pub fn replace_token(self, token: &str, replacement: &str) -> Result<Self> {
        Ok(self.rule(Rule::token(token, replacement)?))
    }

    /// Appends an exact-text rule.
    pub fn replace_literal(self, needle: &str, replacement: &str) -> Result<Self> {
        Ok(self.rule(Rule::literal(needle, replacement)?))
    }

    /// Checks that no rule's replacement is matched by itself or any rule
    /// before it.
    ///
    /// When this holds, a second pass over already rewritten text finds
    /// nothing to do.
    pub fn validate(&self) -> Result<()> {
        for (index, rule) in self.rules.iter().enumerate() {
            for (earlier, prior) in self.rules[..=index].iter().enumerate() {
                if prior.regex().is_match(rule.replacement()) {
                    return Err(RestyleError::RuleOrder { index, earlier });
                }
            }
        }
        Ok(())
    }

    /// Applies every rule in order.
    pub fn apply_all(&self, source: &str) -> String {
        let mut result = source.to_string();
        for rule in &self.rules {
            result = rule.replace_all(&result);
        }
        result
    }

    /// Returns the rules in application order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Returns descriptions of all rules.
    pub fn describe(&self) -> Vec<String> {
        self.rules.iter().map(ToString::to_string).collect()
    }

    /// Returns the number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_apply_sequentially() {
        let rules = RuleSet::new()
            .replace_literal("A", "B")
            .unwrap()
            .replace_literal("B", "C")
            .unwrap();

        assert_eq!(rules.apply_all("xAx"), "xCx");
    }

    #[test]
    fn test_specific_rule_before_general_rule() {
        let rules = RuleSet::new()
            .replace_literal("const Color(0xFFA01560)", "AppColors.burgundyDark")
            .unwrap()
            .replace_literal("Color(0xFFA01560)", "AppColors.burgundyDark")
            .unwrap();

        let source = "a: const Color(0xFFA01560), b: Color(0xFFA01560)";
        assert_eq!(
            rules.apply_all(source),
            "a: AppColors.burgundyDark, b: AppColors.burgundyDark"
        );
    }

    #[test]
    fn test_validate_accepts_forward_chaining() {
        let rules = RuleSet::new()
            .replace_literal("A", "B")
            .unwrap()
            .replace_literal("B", "C")
            .unwrap();

        assert!(rules.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_replacement_matched_by_earlier_rule() {
        let rules = RuleSet::new()
            .replace_token("Colors.black", "AppColors.darkText")
            .unwrap()
            .replace_literal("Colors.grey", "Colors.black")
            .unwrap();

        let err = rules.validate().unwrap_err();
        assert!(matches!(
            err,
            RestyleError::RuleOrder {
                index: 1,
                earlier: 0
            }
        ));
    }

    #[test]
    fn test_validate_rejects_self_matching_rule() {
        let rules = RuleSet::new().replace_literal("grey", "darkgrey").unwrap();

        assert!(matches!(
            rules.validate(),
            Err(RestyleError::RuleOrder {
                index: 0,
                earlier: 0
            })
        ));
    }

    #[test]
    fn test_second_pass_is_a_no_op() {
        let rules = RuleSet::new()
            .replace_token("Colors.white", "AppColors.white")
            .unwrap()
            .replace_token("Colors.grey.shade600", "AppColors.lightText")
            .unwrap();
        rules.validate().unwrap();

        let once = rules.apply_all("Colors.white; Colors.grey.shade600;");
        let twice = rules.apply_all(&once);

        assert_eq!(once, "AppColors.white; AppColors.lightText;");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_rule_set() {
        let rules = RuleSet::new();

        assert!(rules.is_empty());
        assert_eq!(rules.apply_all("unchanged"), "unchanged");
        assert!(rules.validate().is_ok());
    }

    #[test]
    fn test_describe() {
        let rules = RuleSet::new()
            .replace_literal("a", "b")
            .unwrap()
            .replace_token("c", "d")
            .unwrap();

        assert_eq!(rules.len(), 2);
        assert_eq!(
            rules.describe(),
            vec![
                "Replace pattern 'a' with 'b'".to_string(),
                r"Replace pattern '\bc\b' with 'd'".to_string(),
            ]
        );
    }
}

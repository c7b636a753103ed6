use std::sync::Arc;

use crate::parse::{tokenize, Token};
use crate::{Condition, EngineConfig, Error, Rule};

/// Fold resolved rules into one AND-tree, left to right.
///
/// Returns the combined condition and its synthesized source text. Repeated
/// rules are kept: `[a, a, b]` becomes `(a AND a) AND b`. The result must stay
/// within `config`'s nesting and tree limits so its source parses back.
pub(crate) fn combine(
    rules: &[Arc<Rule>],
    config: &EngineConfig,
) -> Result<(Condition, String), Error> {
    let (first, rest) = rules
        .split_first()
        .ok_or_else(|| Error::invalid_input("empty rule list"))?;

    let nesting = 1 + rules
        .iter()
        .map(|rule| paren_nesting(&rule.source))
        .max()
        .unwrap_or(0);
    if nesting > config.max_nesting_depth {
        return Err(Error::invalid_input(format!(
            "combined source would nest {nesting} parentheses, limit is {}",
            config.max_nesting_depth
        )));
    }

    let height = rest.iter().fold(first.condition.depth(), |acc, rule| {
        acc.max(rule.condition.depth()) + 1
    });
    if height > config.max_tree_depth {
        return Err(Error::invalid_input(format!(
            "combined tree would be {height} levels deep, limit is {}",
            config.max_tree_depth
        )));
    }

    let condition = rest.iter().fold(first.condition.clone(), |acc, rule| {
        acc.and(rule.condition.clone())
    });

    let source = rules
        .iter()
        .map(|rule| format!("({})", rule.source))
        .collect::<Vec<_>>()
        .join(" AND ");

    Ok((condition, source))
}

/// Deepest parenthesis nesting in `source`. Counting stops at a lex error.
fn paren_nesting(source: &str) -> usize {
    let mut depth = 0_usize;
    let mut deepest = 0;
    for spanned in tokenize(source).map_while(Result::ok) {
        match spanned.token {
            Token::LParen => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            Token::RParen => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}

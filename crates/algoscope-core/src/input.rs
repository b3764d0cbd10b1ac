//! Parsing of free-form user input.
//!
//! Values are accepted separated by commas and/or whitespace. Structure
//! operations take a single value per call.

use crate::error::ParseError;

fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Parse a single finite number, e.g. the value typed into a push box.
pub fn parse_value(text: &str) -> Result<f64, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ParseError::NotANumber(trimmed.to_string())),
    }
}

/// Parse a list of numbers for a custom sorting array.
///
/// Tokens that are not numbers are skipped; at least `min` numbers must
/// survive.
pub fn parse_number_list(text: &str, min: usize) -> Result<Vec<f64>, ParseError> {
    let values: Vec<f64> = tokens(text)
        .filter_map(|t| t.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .collect();
    if values.len() < min {
        return Err(ParseError::TooFew { min, got: values.len() });
    }
    Ok(values)
}

/// Parse the values for a tree build. Every token must be an integer.
pub fn parse_tree_values(text: &str) -> Result<Vec<i64>, ParseError> {
    let mut values = Vec::new();
    for token in tokens(text) {
        let value = token
            .parse::<i64>()
            .map_err(|_| ParseError::NotAnInteger(token.to_string()))?;
        values.push(value);
    }
    if values.is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(values)
}

/// Parse a node specification.
///
/// A single non-negative integer `n` means ids `0..n`; anything else is a
/// comma/space separated list of labels.
pub fn parse_node_ids(spec: &str) -> Result<Vec<String>, ParseError> {
    let trimmed = spec.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }
    if let Ok(count) = trimmed.parse::<usize>() {
        if count == 0 {
            return Err(ParseError::Empty);
        }
        return Ok((0..count).map(|i| i.to_string()).collect());
    }
    let mut ids: Vec<String> = Vec::new();
    for token in tokens(trimmed) {
        if !ids.iter().any(|id| id == token) {
            ids.push(token.to_string());
        }
    }
    Ok(ids)
}

/// One parsed `a-b` or `a-b:w` edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeSpec {
    pub a: String,
    pub b: String,
    pub weight: u32,
}

/// Parse an edge list such as `0-1:4, 1-2 2-3:1`.
///
/// Malformed items are skipped. A missing, non-numeric or zero weight
/// becomes 1.
pub fn parse_edges(spec: &str) -> Vec<EdgeSpec> {
    tokens(spec)
        .filter_map(|item| {
            let (pair, weight) = match item.split_once(':') {
                Some((pair, w)) => (pair, w.trim().parse::<u32>().ok().filter(|w| *w >= 1)),
                None => (item, None),
            };
            let (a, b) = pair.split_once('-')?;
            let (a, b) = (a.trim(), b.trim());
            if a.is_empty() || b.is_empty() {
                return None;
            }
            Some(EdgeSpec {
                a: a.to_string(),
                b: b.to_string(),
                weight: weight.unwrap_or(1),
            })
        })
        .collect()
}

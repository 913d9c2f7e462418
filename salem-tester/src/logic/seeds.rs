use anyhow::{Context, Result, bail};
use std::collections::HashSet;

/// Seed used when the CLI supplies nothing usable.
pub const DEFAULT_SEED: u64 = 1337;

/// Upper bound on how many seeds one range token may expand to.
const MAX_RANGE_LEN: u64 = 10_000;

/// Resolve a list of CLI seed arguments into concrete seeds.
///
/// Supports literal integers (negative values use their magnitude) and the
/// ranges `a..b` and `a..=b`. Duplicates are dropped while keeping the
/// first occurrence's position.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<u64>> {
    let mut pending: Vec<u64> = Vec::new();

    for token in tokens {
        if token.is_empty() {
            continue;
        }

        if let Ok(value) = token.parse::<i64>() {
            pending.push(value.unsigned_abs());
            continue;
        }

        if let Ok(value) = token.parse::<u64>() {
            pending.push(value);
            continue;
        }

        if let Some(range) = parse_range(token)? {
            pending.extend(range);
            continue;
        }

        bail!("Unrecognized seed token: {token}");
    }

    let mut seen = HashSet::new();
    let mut deduped: Vec<u64> = pending.into_iter().filter(|s| seen.insert(*s)).collect();

    if deduped.is_empty() {
        deduped.push(DEFAULT_SEED);
    }

    Ok(deduped)
}

fn parse_range(token: &str) -> Result<Option<std::ops::RangeInclusive<u64>>> {
    let (start, end, inclusive) = if let Some((start, end)) = token.split_once("..=") {
        (start, end, true)
    } else if let Some((start, end)) = token.split_once("..") {
        (start, end, false)
    } else {
        return Ok(None);
    };

    let start: u64 = start
        .trim()
        .parse()
        .with_context(|| format!("invalid range start in seed token: {token}"))?;
    let end: u64 = end
        .trim()
        .parse()
        .with_context(|| format!("invalid range end in seed token: {token}"))?;

    let last = if inclusive {
        end
    } else if end > start {
        end - 1
    } else {
        bail!("empty seed range: {token}");
    };
    if last < start {
        bail!("empty seed range: {token}");
    }
    if last - start >= MAX_RANGE_LEN {
        bail!("seed range {token} expands past {MAX_RANGE_LEN} seeds");
    }
    Ok(Some(start..=last))
}

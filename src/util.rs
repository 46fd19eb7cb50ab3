use anyhow::{anyhow, Context, Result};

/// Accepts decimal (`42`) or hex (`0x2a`) seeds.
pub fn parse_seed(raw: &str) -> Result<u32> {
    let trimmed = raw.trim();
    match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => {
            u32::from_str_radix(hex, 16).with_context(|| format!("invalid hex seed: {trimmed}"))
        }
        None if trimmed.is_empty() => Err(anyhow!("empty seed")),
        None => trimmed
            .parse::<u32>()
            .with_context(|| format!("invalid decimal seed: {trimmed}")),
    }
}

pub fn seed_to_hex(seed: u32) -> String {
    format!("0x{seed:08x}")
}

/// Explicit comma-separated list, or `count` consecutive seeds from `start`.
pub fn resolve_seeds(list: Option<&str>, start: Option<&str>, count: u32) -> Result<Vec<u32>> {
    if let Some(list) = list {
        let seeds = list
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(parse_seed)
            .collect::<Result<Vec<_>>>()?;
        if seeds.is_empty() {
            return Err(anyhow!("no seeds parsed from --seeds"));
        }
        return Ok(seeds);
    }
    if count == 0 {
        return Err(anyhow!("--seed-count must be >= 1"));
    }
    let first = start.map(parse_seed).transpose()?.unwrap_or(1);
    Ok((0..count).map(|offset| first.wrapping_add(offset)).collect())
}

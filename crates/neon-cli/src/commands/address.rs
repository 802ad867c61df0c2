// SPDX-License-Identifier: AGPL-3.0-only
use colored::*;
use neon_core::deployment::{LOCKER_NONCE, REFERRAL_NONCE, TOKEN_NONCE};
use neon_core::Address;

const CONTRACTS: [(&str, u64); 3] = [
    ("token", TOKEN_NONCE),
    ("referral", REFERRAL_NONCE),
    ("locker", LOCKER_NONCE),
];

pub fn handle(seeds: &[String], deployer: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    for seed in seeds {
        println!("{:<12} {}", seed.bold(), Address::from_seed(seed));
    }
    if let Some(d) = deployer {
        let deployer = resolve(d)?;
        println!("{:<12} {}", "deployer".bold(), deployer);
        for (name, nonce) in CONTRACTS {
            println!("{:<12} {}", name.cyan(), Address::derive_contract(&deployer, nonce));
        }
    }
    Ok(())
}

/// Hex address as-is, anything else (with or without a leading `@`) as a
/// seed label.
pub fn resolve(input: &str) -> Result<Address, Box<dyn std::error::Error>> {
    if input.starts_with("0x") {
        Ok(input.parse()?)
    } else {
        Ok(Address::from_seed(input.trim_start_matches('@')))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve() {
        assert_eq!(resolve("alice").unwrap(), Address::from_seed("alice"));
        assert_eq!(resolve("@alice").unwrap(), Address::from_seed("alice"));
        let hex = Address::from_seed("bob").to_string();
        assert_eq!(resolve(&hex).unwrap(), Address::from_seed("bob"));
        assert!(resolve("0x1234").is_err());
    }
}

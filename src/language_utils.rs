use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// Container track language tags mix ISO 639-1 (2-letter) and ISO 639-2
/// (3-letter, T and B variants) spellings; this module normalizes and
/// compares them so track matching is tolerant of the spelling in use.
/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase();

    // If it's a 2-letter code, convert to 3-letter
    if normalized_code.len() == 2 {
        if let Some(lang) = Language::from_639_1(&normalized_code) {
            return Ok(lang.to_639_3().to_string());
        }
    }
    // If it's already a 3-letter code, ensure it's ISO 639-2/T
    else if normalized_code.len() == 3 {
        // Check if it's already a valid ISO 639-2/T code
        if Language::from_639_3(&normalized_code).is_some() {
            return Ok(normalized_code);
        }

        // Check if it's a ISO 639-2/B code that needs converting to ISO 639-2/T
        match normalized_code.as_str() {
            "fre" => return Ok("fra".to_string()),
            "ger" => return Ok("deu".to_string()),
            "dut" => return Ok("nld".to_string()),
            "gre" => return Ok("ell".to_string()),
            "chi" => return Ok("zho".to_string()),
            "cze" => return Ok("ces".to_string()),
            "ice" => return Ok("isl".to_string()),
            "alb" => return Ok("sqi".to_string()),
            "arm" => return Ok("hye".to_string()),
            "baq" => return Ok("eus".to_string()),
            "bur" => return Ok("mya".to_string()),
            "per" => return Ok("fas".to_string()),
            "geo" => return Ok("kat".to_string()),
            "may" => return Ok("msa".to_string()),
            "mac" => return Ok("mkd".to_string()),
            "rum" => return Ok("ron".to_string()),
            "slo" => return Ok("slk".to_string()),
            "wel" => return Ok("cym".to_string()),
            _ => {}
        }
    }

    Err(anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Check if two language codes match (represent the same language)
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    let normalized1 = match normalize_to_part2t(code1) {
        Ok(n) => n,
        Err(_) => return false,
    };

    let normalized2 = match normalize_to_part2t(code2) {
        Ok(n) => n,
        Err(_) => return false,
    };

    normalized1 == normalized2
}

/// Get the language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = normalize_to_part2t(code)?;
    let lang = Language::from_639_3(&normalized)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}

// src/taxonomy/mod.rs
//! Manchester Protocol classification taxonomy: the pure mapping from a
//! classification code to its presentation tier.

/// The five urgency codes, declared in descending order of urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassificationCode {
    Vermelho,
    Laranja,
    Amarelo,
    Verde,
    Azul,
}

impl ClassificationCode {
    pub const ALL: [ClassificationCode; 5] = [
        ClassificationCode::Vermelho,
        ClassificationCode::Laranja,
        ClassificationCode::Amarelo,
        ClassificationCode::Verde,
        ClassificationCode::Azul,
    ];

    /// Case-insensitive, whitespace-tolerant parse. `None` for unknown codes.
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "vermelho" => Some(ClassificationCode::Vermelho),
            "laranja" => Some(ClassificationCode::Laranja),
            "amarelo" => Some(ClassificationCode::Amarelo),
            "verde" => Some(ClassificationCode::Verde),
            "azul" => Some(ClassificationCode::Azul),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationCode::Vermelho => "vermelho",
            ClassificationCode::Laranja => "laranja",
            ClassificationCode::Amarelo => "amarelo",
            ClassificationCode::Verde => "verde",
            ClassificationCode::Azul => "azul",
        }
    }
}

/// Presentation tier derived from a classification code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tier {
    pub color_class: Option<&'static str>,
    pub icon: Option<&'static str>,
    pub label: String,
}

/// Total mapping from a raw classification code to its tier.
///
/// Unrecognized codes degrade gracefully: no color class, no icon, and the
/// raw code uppercased as the label.
pub fn tier_of(code: &str) -> Tier {
    match ClassificationCode::parse(code) {
        Some(ClassificationCode::Vermelho) => Tier {
            color_class: Some("classification-red"),
            icon: Some("🔴"),
            label: "EMERGÊNCIA (VERMELHO)".to_string(),
        },
        Some(ClassificationCode::Laranja) => Tier {
            color_class: Some("classification-orange"),
            icon: Some("🟠"),
            label: "MUITO URGENTE (LARANJA)".to_string(),
        },
        Some(ClassificationCode::Amarelo) => Tier {
            color_class: Some("classification-yellow"),
            icon: Some("🟡"),
            label: "URGENTE (AMARELO)".to_string(),
        },
        Some(ClassificationCode::Verde) => Tier {
            color_class: Some("classification-green"),
            icon: Some("🟢"),
            label: "POUCO URGENTE (VERDE)".to_string(),
        },
        Some(ClassificationCode::Azul) => Tier {
            color_class: Some("classification-blue"),
            icon: Some("🔵"),
            label: "NÃO URGENTE (AZUL)".to_string(),
        },
        None => Tier {
            color_class: None,
            icon: None,
            label: code.trim().to_uppercase(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_known_codes_have_distinct_nonempty_tiers() {
        let mut colors = HashSet::new();
        let mut icons = HashSet::new();
        let mut labels = HashSet::new();

        for code in ClassificationCode::ALL {
            let tier = tier_of(code.as_str());
            assert!(colors.insert(tier.color_class.expect("known code has a color")));
            assert!(icons.insert(tier.icon.expect("known code has an icon")));
            assert!(!tier.label.is_empty());
            assert!(labels.insert(tier.label));
        }

        assert_eq!(labels.len(), 5);
    }

    #[test]
    fn test_tier_of_is_case_insensitive_and_stable() {
        assert_eq!(tier_of("vermelho"), tier_of("VERMELHO"));
        assert_eq!(tier_of("Laranja"), tier_of("  laranja  "));
        assert_eq!(tier_of("azul"), tier_of("azul"));
    }

    #[test]
    fn test_vermelho_is_the_emergency_tier() {
        let tier = tier_of("vermelho");
        assert_eq!(tier.color_class, Some("classification-red"));
        assert_eq!(tier.icon, Some("🔴"));
        assert_eq!(tier.label, "EMERGÊNCIA (VERMELHO)");
    }

    #[test]
    fn test_unknown_code_degrades_gracefully() {
        let tier = tier_of("roxo");
        assert_eq!(tier.color_class, None);
        assert_eq!(tier.icon, None);
        assert_eq!(tier.label, "ROXO");
    }

    #[test]
    fn test_parse_rejects_unknown_codes() {
        assert_eq!(ClassificationCode::parse("roxo"), None);
        assert_eq!(
            ClassificationCode::parse(" Verde "),
            Some(ClassificationCode::Verde)
        );
    }
}

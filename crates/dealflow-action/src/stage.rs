//! Stage suggestion normalization.
//!
//! Maps free-text stage suggestions onto the closed [`DealStage`] enum. This
//! is the only gate between raw AI text and a persisted stage value: a miss
//! means the suggestion is suppressed, never defaulted.

use dealflow_core::types::DealStage;

/// Keyword rules scanned in priority order; first containment match wins.
const STAGE_KEYWORDS: &[(&str, DealStage)] = &[
    ("lead", DealStage::Lead),
    ("prospect", DealStage::Lead),
    ("discovery", DealStage::Discovery),
    ("qualification", DealStage::Discovery),
    ("initial", DealStage::Discovery),
    ("qualified", DealStage::Qualified),
    ("opportunity", DealStage::Qualified),
    ("proposal", DealStage::ProposalSent),
    ("quote", DealStage::ProposalSent),
    ("draft", DealStage::ProposalSent),
    ("negotiat", DealStage::Negotiation),
    ("contract", DealStage::Negotiation),
    ("terms", DealStage::Negotiation),
    ("won", DealStage::ClosedWon),
    ("success", DealStage::ClosedWon),
    ("lost", DealStage::ClosedLost),
    ("rejected", DealStage::ClosedLost),
];

/// Normalize a free-text stage suggestion.
///
/// Exact label matches (case-insensitive) win; otherwise the keyword table
/// is scanned in order. `None` means "suppress the stage update".
pub fn normalize(text: &str) -> Option<DealStage> {
    let lowered = text.trim().to_lowercase();
    if lowered.is_empty() {
        return None;
    }

    for stage in DealStage::ALL {
        if lowered == stage.as_str().to_lowercase() {
            return Some(stage);
        }
    }

    STAGE_KEYWORDS
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, stage)| *stage)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- exact matches ----

    #[test]
    fn test_exact_labels_match_case_insensitively() {
        assert_eq!(normalize("Lead"), Some(DealStage::Lead));
        assert_eq!(normalize("discovery"), Some(DealStage::Discovery));
        assert_eq!(normalize("QUALIFIED"), Some(DealStage::Qualified));
        assert_eq!(normalize("proposal sent"), Some(DealStage::ProposalSent));
        assert_eq!(normalize("Negotiation"), Some(DealStage::Negotiation));
        assert_eq!(normalize("Closed Won"), Some(DealStage::ClosedWon));
        assert_eq!(normalize("closed lost"), Some(DealStage::ClosedLost));
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        assert_eq!(normalize("  Closed Won  "), Some(DealStage::ClosedWon));
    }

    // ---- keyword scan ----

    #[test]
    fn test_quote_maps_to_proposal_sent() {
        assert_eq!(normalize("Sending the quote now"), Some(DealStage::ProposalSent));
    }

    #[test]
    fn test_lead_keywords() {
        assert_eq!(normalize("new prospect from the webinar"), Some(DealStage::Lead));
    }

    #[test]
    fn test_discovery_keywords() {
        assert_eq!(normalize("still in qualification"), Some(DealStage::Discovery));
        assert_eq!(normalize("initial conversation"), Some(DealStage::Discovery));
    }

    #[test]
    fn test_qualified_keywords() {
        assert_eq!(normalize("a real opportunity here"), Some(DealStage::Qualified));
    }

    #[test]
    fn test_proposal_keywords() {
        assert_eq!(normalize("draft is with legal"), Some(DealStage::ProposalSent));
        assert_eq!(normalize("proposal went out Monday"), Some(DealStage::ProposalSent));
    }

    #[test]
    fn test_negotiation_keywords() {
        assert_eq!(normalize("negotiating the discount"), Some(DealStage::Negotiation));
        assert_eq!(normalize("reviewing contract terms"), Some(DealStage::Negotiation));
    }

    #[test]
    fn test_closed_keywords() {
        assert_eq!(normalize("we won the account"), Some(DealStage::ClosedWon));
        assert_eq!(normalize("great success"), Some(DealStage::ClosedWon));
        assert_eq!(normalize("they went with a competitor, lost"), Some(DealStage::ClosedLost));
        assert_eq!(normalize("offer was rejected"), Some(DealStage::ClosedLost));
    }

    #[test]
    fn test_priority_order_first_match_wins() {
        // Contains both "lead" and "won"; the lead rule sits earlier.
        assert_eq!(normalize("the lead was won over"), Some(DealStage::Lead));
        // Contains both "discovery" and "qualified"; discovery wins.
        assert_eq!(normalize("discovery call, highly qualified"), Some(DealStage::Discovery));
    }

    // ---- misses ----

    #[test]
    fn test_unmappable_text_returns_none() {
        assert_eq!(normalize("xyz"), None);
        assert_eq!(normalize("None"), None);
        assert_eq!(normalize("circle back next quarter"), None);
    }

    #[test]
    fn test_empty_input_returns_none() {
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("   "), None);
    }

    #[test]
    fn test_every_table_entry_maps_to_its_stage() {
        for (keyword, stage) in STAGE_KEYWORDS {
            // A keyword embedded in noise must still land on a stage; earlier
            // rules may shadow later ones, so only assert the bare keyword.
            assert_eq!(normalize(keyword), Some(*stage), "keyword {:?}", keyword);
        }
    }
}

//! Intent classification over normalized message text
//!
//! Classification is intent-only: it never consults session state, so the
//! same function serves every stage. Keyword sets are plain data, matched by
//! substring containment on already-normalized text (see the normalizer).

use crate::normalizer::digits_only;
use crate::session::TopicCode;

/// Categorical judgment of what an inbound message means for routing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Explicit request for a live operator
    HumanRequest,
    /// Login/access/error vocabulary
    Support,
    /// Deadline/criteria/decree vocabulary
    Rules,
    /// Literal "menu" command
    MenuCommand,
    /// Literal "reiniciar"/"reset" command
    ResetCommand,
    /// A message reducing to a single digit 1-7
    Numeric(TopicCode),
    /// Anything else
    FreeText,
}

/// Operator shortcut digit, kept out of the numeric topic range
const OPERATOR_DIGIT: &str = "0";

const HUMAN_KEYWORDS: &[&str] = &["atendente", "humano", "transferir", "falar com"];

const SUPPORT_KEYWORDS: &[&str] = &[
    "login",
    "acesso",
    "senha",
    "erro",
    "nao consigo",
    "bloqueado",
    "travou",
];

const RULES_KEYWORDS: &[&str] = &[
    "prazo",
    "cronograma",
    "criterio",
    "pontuacao",
    "regra",
    "decreto",
    "resolucao",
    "normativa",
];

/// Classify normalized text into a routing intent
///
/// Priority: exact command literals, then the human-request set, then
/// support before rules (access failures are the more urgent match), then
/// numeric selection, then free text.
pub fn classify(text: &str) -> Intent {
    if text == "menu" {
        return Intent::MenuCommand;
    }
    if text == "reiniciar" || text == "reset" {
        return Intent::ResetCommand;
    }
    if text == OPERATOR_DIGIT || contains_any(text, HUMAN_KEYWORDS) {
        return Intent::HumanRequest;
    }
    if contains_any(text, SUPPORT_KEYWORDS) {
        return Intent::Support;
    }
    if contains_any(text, RULES_KEYWORDS) {
        return Intent::Rules;
    }

    let digits = digits_only(text);
    if let Some(code) = TopicCode::parse(&digits) {
        return Intent::Numeric(code);
    }

    Intent::FreeText
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| text.contains(kw))
}

//! Canned reply texts
//!
//! Pure data: the welcome/identification prompt, the numbered menu, one
//! guidance paragraph per topic code, and the short acknowledgment texts.
//! The topic mapping is total over codes 1-7.

use crate::session::TopicCode;

/// Welcome and identification prompt sent on first contact
pub const WELCOME: &str = "Olá, este é o Canal de Atendimento do PAER/SESP.\n\n\
O PAER é a Premiação Anual por Eficiência e Resultado da Segurança Pública.\n\
Neste ciclo, estão sendo analisados os pedidos referentes ao período de 31/10/2025 a 31/12/2025.\n\n\
⚠️ Para iniciar o atendimento, informe (em uma única mensagem, se possível):\n\
▫️ Nome completo:\n\
▫️ CPF:\n\
▫️ Órgão de origem (PM, PJC, CBM ou POLITEC):\n\
▫️ Unidade de lotação atual:\n\
▫️ Se integra comissão/equipe, informe qual:\n\n\
Se quiser falar direto com atendente, digite: 0";

/// Numbered topic menu, sent after identification and on MENU
pub const MENU: &str = "Agora escolha o assunto (envie só o número):\n\
1️⃣ Cadastro do pedido\n\
2️⃣ Prazos e cronograma\n\
3️⃣ Regras / pontuação / critérios\n\
4️⃣ Problemas de acesso ao sistema\n\
5️⃣ Comissão / atribuições\n\
6️⃣ Envio de documentos\n\
7️⃣ Outro assunto\n\n\
Para atendente, digite: 0";

/// Confirmation prefixed to the menu once the profile is captured
pub const PROFILE_RECEIVED: &str = "✅ Identificação recebida.";

/// Re-prompt for unrecognized input during topic selection
pub const REPROMPT: &str = "Envie um número de 1 a 7. Para menu: MENU. Para atendente: 0";

/// Acknowledgment when escalating to a live operator
pub const HANDOFF_ACK: &str =
    "✅ Certo. Vou encaminhar para um atendente.\n(Para voltar ao menu depois, digite: MENU)";

/// Acknowledgment for any message while already escalated
pub const HUMAN_STAGE_ACK: &str =
    "Um atendente dará sequência ao seu atendimento. Aguarde, por favor.";

/// Confirmation after a session reset
pub const RESET_CONFIRM: &str = "🔄 Atendimento reiniciado.";

/// Notice for non-text or empty messages
pub const TEXT_ONLY_NOTICE: &str =
    "Por enquanto só consigo atender mensagens de texto. Escreva sua dúvida, por favor.";

/// Fallback when no topic is on record
pub const DESCRIBE_QUESTION: &str = "📝 Escreva sua dúvida completa, por favor.";

/// Footer appended to every topic answer
const TOPIC_FOOTER: &str = "Para voltar ao menu: MENU\nPara atendente: 0";

/// Guidance paragraph for a topic code; total over 1-7
pub fn topic_answer(code: TopicCode) -> &'static str {
    match code.as_char() {
        '1' => "📌 *Cadastro do pedido*\nMe diga qual etapa você está (ex: cadastro, evidências, envio, conclusão) e qual mensagem/erro aparece.",
        '2' => "⏱️ *Prazos e cronograma*\nMe diga se sua dúvida é sobre: prazo do usuário, prazo de análise, prazo de recurso ou cronograma geral.",
        '3' => "🎯 *Regras / pontuação / critérios*\nDescreva a ocorrência/ação e qual órgão (PM/PJC/CBM/POLITEC).",
        '4' => "🧩 *Problemas de acesso*\nInforme seu órgão e o erro (print ou texto).",
        '5' => "👥 *Comissão / atribuições*\nQual comissão/equipe você faz parte e qual dúvida específica?",
        '6' => "📎 *Envio de documentos*\nQual tipo de evidência você vai anexar (pdf, foto, boletim, relatório) e qual etapa do sistema?",
        // '7' — "other subject"; in menu-driven flows selection of 7 escalates
        // before this text is ever needed
        _ => "📝 *Outro assunto*\nEscreva sua dúvida completa.",
    }
}

/// Full topic reply: guidance text plus the menu/operator footer
pub fn topic_reply(code: TopicCode) -> String {
    format!("{}\n\n{TOPIC_FOOTER}", topic_answer(code))
}

/// Re-answer for free text while in a topic; falls back to a generic
/// prompt when no topic is on record
pub fn in_topic_reply(code: Option<TopicCode>) -> String {
    match code {
        Some(code) => topic_reply(code),
        None => format!("{DESCRIBE_QUESTION}\n\n{TOPIC_FOOTER}"),
    }
}

/// Menu preceded by the profile-received confirmation
pub fn profile_received_menu() -> String {
    format!("{PROFILE_RECEIVED}\n\n{MENU}")
}

/// Reset confirmation followed by the welcome prompt
pub fn reset_reply() -> String {
    format!("{RESET_CONFIRM}\n\n{WELCOME}")
}

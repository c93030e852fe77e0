//! Reply formatting

use crate::core::consts::reply::{DEFAULT_BOT_NAME, HEADER, NO_INFORMATION};
use crate::knowledge::{Entry, KnowledgeTable};

#[derive(Debug, Clone)]
pub struct ReplyFormatter {
    footer: String,
}

impl Default for ReplyFormatter {
    fn default() -> Self { Self::new(DEFAULT_BOT_NAME) }
}

impl ReplyFormatter {
    pub fn new(bot_name: &str) -> Self {
        Self { footer: format!("Thank you for using u/{}! :)", bot_name) }
    }

    pub fn footer(&self) -> &str { &self.footer }

    /// Build the reply body, or `None` when there is nothing to say.
    ///
    /// Names are rendered in order, repeats included. A name missing from the
    /// table renders the "no information" line; names produced by the
    /// extractor always come from the table, so the bot never hits that path.
    pub fn format(&self, names: &[&str], table: &KnowledgeTable) -> Option<String> {
        if names.is_empty() {
            return None;
        }
        let mut body = format!("{}\n\n", HEADER);
        for name in names {
            match table.get(name) {
                Some(Entry::Description(text)) => body.push_str(&format!("**{}:**\n{}\n\n", name, text)),
                Some(Entry::Hand(hand)) => {
                    body.push_str(&format!("**{}:**\n", name));
                    for (label, value) in hand.fields() {
                        body.push_str(&format!("{}: {}\n", label, value));
                    }
                    body.push('\n');
                }
                None => body.push_str(&format!("**{}:** {}\n\n", name, NO_INFORMATION)),
            }
        }
        body.push('\n');
        body.push_str(&self.footer);
        Some(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_produces_no_reply() {
        let table = KnowledgeTable::builtin().unwrap();
        assert_eq!(ReplyFormatter::default().format(&[], &table), None);
    }

    #[test]
    fn description_entry() {
        let table = KnowledgeTable::builtin().unwrap();
        let body = ReplyFormatter::default().format(&["Foil"], &table).unwrap();
        assert_eq!(
            body,
            "Here is some information about the cards you mentioned:\n\n\
             **Foil:**\n+50 Chips\n\n\
             \nThank you for using u/BalatroBot! :)"
        );
    }

    #[test]
    fn hand_entry_renders_both_fields_in_order() {
        let table = KnowledgeTable::builtin().unwrap();
        let body = ReplyFormatter::default().format(&["Pair"], &table).unwrap();
        let score = body.find("Base Score: 10 Chips x 2 Mult").unwrap();
        let how = body.find("How to Play the Hand: Two cards with a matching rank").unwrap();
        assert!(body.contains("**Pair:**\n"));
        assert!(score < how);
    }

    #[test]
    fn repeats_render_twice_with_one_footer() {
        let table = KnowledgeTable::builtin().unwrap();
        let fmt = ReplyFormatter::new("TestBot");
        let body = fmt.format(&["Mult", "Foil", "Mult"], &table).unwrap();
        assert_eq!(body.matches("**Mult:**").count(), 2);
        assert_eq!(body.matches("Thank you for using u/TestBot! :)").count(), 1);
        assert!(body.find("**Mult:**").unwrap() < body.find("**Foil:**").unwrap());
        assert!(body.ends_with(fmt.footer()));
    }

    #[test]
    fn unknown_name_gets_placeholder() {
        let table = KnowledgeTable::builtin().unwrap();
        let body = ReplyFormatter::default().format(&["Not A Card"], &table).unwrap();
        assert!(body.contains("**Not A Card:** No information available"));
    }
}

/// Chat commands answered without calling the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    /// Reset the conversation and show the welcome text
    Clear,
    /// Switch the reply language, e.g. `translate hi`
    Translate(String),
}

const TRANSLATE_PREFIX: &str = "translate ";

impl Command {
    pub fn parse(input: &str) -> Option<Self> {
        let normalized = input.trim().to_lowercase();
        match normalized.as_str() {
            "help" => return Some(Self::Help),
            "clear" => return Some(Self::Clear),
            _ => {}
        }
        
        // prefix is matched on the raw input, so leading blanks or a tab after the verb do not count
        let head = input.get(..TRANSLATE_PREFIX.len())?;
        if !head.eq_ignore_ascii_case(TRANSLATE_PREFIX) {
            return None;
        }
        input[TRANSLATE_PREFIX.len()..]
            .split_whitespace()
            .next()
            .map(|lang| Self::Translate(lang.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(Command::parse("help"), Some(Command::Help));
        assert_eq!(Command::parse("  HELP \n"), Some(Command::Help));
        assert_eq!(Command::parse("Clear"), Some(Command::Clear));
    }

    #[test]
    fn test_parse_translate() {
        assert_eq!(Command::parse("translate hi"), Some(Command::Translate("hi".to_string())));
        assert_eq!(Command::parse("Translate  ta please"), Some(Command::Translate("ta".to_string())));
        assert_eq!(Command::parse("TRANSLATE zh-Hans"), Some(Command::Translate("zh-Hans".to_string())));
        assert_eq!(Command::parse("translate"), None);
        assert_eq!(Command::parse("translate "), None);
    }

    #[test]
    fn test_translate_needs_literal_prefix() {
        assert_eq!(Command::parse(" translate hi"), None);
        assert_eq!(Command::parse("translate\thi"), None);
        assert_eq!(Command::parse("translatehi"), None);
        assert_eq!(Command::parse("traduire"), None);
    }

    #[test]
    fn test_regular_messages_are_not_commands() {
        assert_eq!(Command::parse("help me pick a tractor"), None);
        assert_eq!(Command::parse("translator service"), None);
        assert_eq!(Command::parse(""), None);
    }
}

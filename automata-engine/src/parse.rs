use crate::{ParseError, Pattern};

const META: [char; 5] = ['(', ')', '|', '*', '\\'];

/// Recursive descent over the notation [`Pattern`]'s `Display` writes.
///
/// ```text
/// choice := concat ('|' concat)*
/// concat := repeat*
/// repeat := atom '*'*
/// atom   := '(' choice ')' | '\' META | any other character
/// ```
struct PatternParser {
    input: Vec<char>,
    position: usize,
}

impl PatternParser {
    fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += 1;
        Some(c)
    }

    fn parse(mut self) -> Result<Pattern, ParseError> {
        let pattern = self.choice()?;
        // choice() only stops early at a ')'
        match self.peek() {
            None => Ok(pattern),
            Some(_) => Err(ParseError::UnmatchedClose(self.position)),
        }
    }

    fn choice(&mut self) -> Result<Pattern, ParseError> {
        let mut pattern = self.concat()?;
        while self.peek() == Some('|') {
            self.bump();
            pattern = Pattern::choose(pattern, self.concat()?);
        }
        Ok(pattern)
    }

    fn concat(&mut self) -> Result<Pattern, ParseError> {
        let mut pattern = None;
        while let Some(next) = self.repeat()? {
            pattern = Some(match pattern {
                None => next,
                Some(prev) => Pattern::concatenate(prev, next),
            });
        }
        Ok(pattern.unwrap_or(Pattern::Empty))
    }

    fn repeat(&mut self) -> Result<Option<Pattern>, ParseError> {
        let Some(mut pattern) = self.atom()? else {
            return Ok(None);
        };
        while self.peek() == Some('*') {
            self.bump();
            pattern = Pattern::repeat(pattern);
        }
        Ok(Some(pattern))
    }

    fn atom(&mut self) -> Result<Option<Pattern>, ParseError> {
        let start = self.position;
        match self.peek() {
            None | Some(')') | Some('|') => Ok(None),
            Some('*') => Err(ParseError::NothingToRepeat(start)),
            Some('(') => {
                self.bump();
                let inner = self.choice()?;
                match self.bump() {
                    Some(')') => Ok(Some(inner)),
                    _ => Err(ParseError::UnclosedGroup(start)),
                }
            }
            Some('\\') => {
                self.bump();
                match self.bump() {
                    Some(c) if META.contains(&c) => Ok(Some(Pattern::Literal(c))),
                    Some(c) => Err(ParseError::UnknownEscape(c, start)),
                    None => Err(ParseError::DanglingEscape(start)),
                }
            }
            Some(c) => {
                self.bump();
                Ok(Some(Pattern::Literal(c)))
            }
        }
    }
}

/// Parse pattern notation: `ab` concatenates, `a|b` chooses, `a*` repeats,
/// parentheses group and `\` escapes one of `( ) | * \`.
/// An empty alternative, like the left side of `|b`, is [`Pattern::Empty`].
pub fn parse_pattern(input: impl AsRef<str>) -> Result<Pattern, ParseError> {
    PatternParser::new(input.as_ref()).parse()
}

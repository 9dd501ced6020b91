use super::{CharClass, PatternError};

/// Pattern syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Regex {
    Symbol(CharClass),
    Concat(Box<Regex>, Box<Regex>),
    Alt(Box<Regex>, Box<Regex>),
    /// Zero or more.
    Star(Box<Regex>),
    /// One or more.
    Plus(Box<Regex>),
    /// Zero or one.
    Optional(Box<Regex>),
}

/// Pattern token after implicit concatenation has been made explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Item {
    Symbol(CharClass),
    /// `|`, `.`, or a postfix `*` `+` `?`.
    Op(char),
    Open(usize),
    Close(usize),
}

impl Regex {
    pub fn concat(left: Regex, right: Regex) -> Regex {
        Regex::Concat(Box::new(left), Box::new(right))
    }

    pub fn alt(left: Regex, right: Regex) -> Regex {
        Regex::Alt(Box::new(left), Box::new(right))
    }

    pub fn star(inner: Regex) -> Regex {
        Regex::Star(Box::new(inner))
    }

    pub fn plus(inner: Regex) -> Regex {
        Regex::Plus(Box::new(inner))
    }

    pub fn optional(inner: Regex) -> Regex {
        Regex::Optional(Box::new(inner))
    }

    /// Parse an infix pattern such as `L . (L | D)*` or `LD+`.
    ///
    /// Whitespace is ignored. Adjacent operands concatenate without an
    /// explicit `.`.
    pub fn parse(pattern: &str) -> Result<Regex, PatternError> {
        let items = with_explicit_concat(tokenize(pattern)?);
        let postfix = to_postfix(items)?;
        build(&postfix)
    }

    /// Postfix rendering, e.g. `LLD|*.` for `L(L|D)*`.
    pub fn to_postfix(&self) -> String {
        let mut out = String::new();
        self.write_postfix(&mut out);
        out
    }

    fn write_postfix(&self, out: &mut String) {
        match self {
            Regex::Symbol(class) => out.push(class.symbol()),
            Regex::Concat(l, r) => {
                l.write_postfix(out);
                r.write_postfix(out);
                out.push('.');
            }
            Regex::Alt(l, r) => {
                l.write_postfix(out);
                r.write_postfix(out);
                out.push('|');
            }
            Regex::Star(inner) => {
                inner.write_postfix(out);
                out.push('*');
            }
            Regex::Plus(inner) => {
                inner.write_postfix(out);
                out.push('+');
            }
            Regex::Optional(inner) => {
                inner.write_postfix(out);
                out.push('?');
            }
        }
    }
}

fn tokenize(pattern: &str) -> Result<Vec<Item>, PatternError> {
    let mut items = Vec::new();
    for (at, ch) in pattern.char_indices() {
        let item = match ch {
            c if c.is_whitespace() => continue,
            'L' => Item::Symbol(CharClass::Letter),
            'D' => Item::Symbol(CharClass::Digit),
            '|' | '.' | '*' | '+' | '?' => Item::Op(ch),
            '(' => Item::Open(at),
            ')' => Item::Close(at),
            _ => return Err(PatternError::UnexpectedCharacter { ch, at }),
        };
        items.push(item);
    }
    if items.is_empty() {
        return Err(PatternError::Empty);
    }
    Ok(items)
}

fn ends_operand(item: Item) -> bool {
    matches!(
        item,
        Item::Symbol(_) | Item::Close(_) | Item::Op('*' | '+' | '?')
    )
}

fn starts_operand(item: Item) -> bool {
    matches!(item, Item::Symbol(_) | Item::Open(_))
}

fn with_explicit_concat(items: Vec<Item>) -> Vec<Item> {
    let mut out: Vec<Item> = Vec::with_capacity(items.len() * 2);
    for item in items {
        if let Some(&prev) = out.last() {
            if ends_operand(prev) && starts_operand(item) {
                out.push(Item::Op('.'));
            }
        }
        out.push(item);
    }
    out
}

fn precedence(op: char) -> u8 {
    match op {
        '|' => 1,
        '.' => 2,
        _ => 3,
    }
}

/// Shunting-yard. Postfix operators go straight to the output since they
/// bind to the operand already emitted.
fn to_postfix(items: Vec<Item>) -> Result<Vec<Item>, PatternError> {
    let mut output = Vec::with_capacity(items.len());
    let mut stack: Vec<Item> = Vec::new();

    for item in items {
        match item {
            Item::Symbol(_) => output.push(item),
            Item::Op('*' | '+' | '?') => output.push(item),
            Item::Op(op) => {
                while let Some(&Item::Op(top)) = stack.last() {
                    if precedence(top) < precedence(op) {
                        break;
                    }
                    output.push(Item::Op(top));
                    stack.pop();
                }
                stack.push(item);
            }
            Item::Open(_) => stack.push(item),
            Item::Close(at) => loop {
                match stack.pop() {
                    Some(Item::Open(_)) => break,
                    Some(op) => output.push(op),
                    None => return Err(PatternError::UnbalancedParenthesis { at }),
                }
            },
        }
    }

    while let Some(item) = stack.pop() {
        if let Item::Open(at) = item {
            return Err(PatternError::UnbalancedParenthesis { at });
        }
        output.push(item);
    }
    Ok(output)
}

fn build(postfix: &[Item]) -> Result<Regex, PatternError> {
    let mut stack: Vec<Regex> = Vec::new();
    for &item in postfix {
        let node = match item {
            Item::Symbol(class) => Regex::Symbol(class),
            Item::Op(op) => {
                let missing = PatternError::MissingOperand { op };
                match op {
                    '*' | '+' | '?' => {
                        let inner = stack.pop().ok_or(missing)?;
                        match op {
                            '*' => Regex::star(inner),
                            '+' => Regex::plus(inner),
                            _ => Regex::optional(inner),
                        }
                    }
                    _ => {
                        let right = stack.pop().ok_or_else(|| missing.clone())?;
                        let left = stack.pop().ok_or(missing)?;
                        if op == '|' {
                            Regex::alt(left, right)
                        } else {
                            Regex::concat(left, right)
                        }
                    }
                }
            }
            // Parentheses never survive shunting-yard.
            Item::Open(at) | Item::Close(at) => {
                return Err(PatternError::UnbalancedParenthesis { at })
            }
        };
        stack.push(node);
    }

    let root = stack.pop().ok_or(PatternError::Empty)?;
    if !stack.is_empty() {
        return Err(PatternError::MissingOperand { op: '.' });
    }
    Ok(root)
}

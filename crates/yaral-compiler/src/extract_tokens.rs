//! Split a prepared grammar into a lexical grammar (terminals as regexes) and a
//! syntax grammar whose rules only reference terminals and nonterminals by index.

use std::collections::HashMap;

use yaral_core::grammar::{Precedence, Rule};
use yaral_core::{Interner, Name};

use crate::error::CompileError;
use crate::prepare::PreparedGrammar;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum VariableKind {
    /// Named rule shown in the tree.
    Named,
    /// String literal (keyword, punctuation).
    Anonymous,
    /// `_`-prefixed rule, supertype or generated token; never a node.
    Hidden,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct LexicalVariable {
    pub name: String,
    pub kind: VariableKind,
    pub regex: String,
    /// The whole token is one string literal.
    pub literal: bool,
    pub priority: i32,
    pub immediate: bool,
    pub extra: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Assoc {
    Left,
    Right,
}

/// Syntax rule over indexed symbols.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum IrRule {
    Blank,
    Terminal(usize),
    NonTerminal(usize),
    Seq(Vec<IrRule>),
    Choice(Vec<IrRule>),
    /// One or more.
    Repeat1(Box<IrRule>),
    Field(Name, Box<IrRule>),
    Alias {
        value: String,
        named: bool,
        content: Box<IrRule>,
    },
    Prec {
        value: i32,
        assoc: Option<Assoc>,
        content: Box<IrRule>,
    },
}

#[derive(Clone, Debug)]
pub(crate) struct SyntaxVariable {
    pub name: String,
    pub kind: VariableKind,
    pub rule: IrRule,
}

#[derive(Debug)]
pub(crate) struct ExtractedGrammar {
    pub name: String,
    pub lexical: Vec<LexicalVariable>,
    pub syntax: Vec<SyntaxVariable>,
    pub fields: Interner,
    pub conflicts: Vec<Vec<String>>,
    pub word: Option<usize>,
}

pub(crate) fn extract_tokens(grammar: &PreparedGrammar) -> Result<ExtractedGrammar, CompileError> {
    let mut ex = Extractor::default();

    // Named lexical rules keep definition order and come first.
    for (name, rule) in &grammar.rules {
        if rule.is_lexical() {
            let kind = if name.starts_with('_') {
                VariableKind::Hidden
            } else {
                VariableKind::Named
            };
            let index = ex.push_lexical(name, kind, rule)?;
            ex.lexical_by_name.insert(name.clone(), index);
        }
    }

    let mut syntax_index = HashMap::new();
    for name in grammar.rules.keys() {
        if !ex.lexical_by_name.contains_key(name) {
            syntax_index.insert(name.clone(), syntax_index.len());
        }
    }

    let mut syntax = Vec::with_capacity(syntax_index.len());
    for (name, rule) in &grammar.rules {
        if rule.is_lexical() {
            continue;
        }
        let kind = if name.starts_with('_') || grammar.supertypes.contains(name) {
            VariableKind::Hidden
        } else {
            VariableKind::Named
        };
        let rule = ex.convert(rule, name, &syntax_index)?;
        syntax.push(SyntaxVariable {
            name: name.clone(),
            kind,
            rule,
        });
    }

    for extra in &grammar.extras {
        match extra {
            Rule::Symbol(name) => match ex.lexical_by_name.get(name) {
                Some(&index) => ex.lexical[index].extra = true,
                None => return Err(CompileError::NonTerminalExtra(name.clone())),
            },
            rule if rule.is_lexical() => {
                let index = ex.inline_token(rule, "extra")?;
                ex.lexical[index].extra = true;
            }
            _ => return Err(CompileError::NonTerminalExtra(format!("{extra:?}"))),
        }
    }

    check_duplicates(&ex.lexical)?;

    let word = match &grammar.word {
        Some(name) => Some(
            *ex.lexical_by_name
                .get(name)
                .ok_or_else(|| CompileError::InvalidWord(name.clone()))?,
        ),
        None => None,
    };

    Ok(ExtractedGrammar {
        name: grammar.name.clone(),
        lexical: ex.lexical,
        syntax,
        fields: ex.fields,
        conflicts: grammar.conflicts.clone(),
        word,
    })
}

#[derive(Default)]
struct Extractor {
    lexical: Vec<LexicalVariable>,
    lexical_by_name: HashMap<String, usize>,
    literals: HashMap<String, usize>,
    inline_tokens: HashMap<Rule, usize>,
    fields: Interner,
}

impl Extractor {
    fn push_lexical(
        &mut self,
        name: &str,
        kind: VariableKind,
        rule: &Rule,
    ) -> Result<usize, CompileError> {
        let regex = to_regex(rule, name)?;
        validate_regex(&regex, name)?;
        let index = self.lexical.len();
        let literal = literal_value(rule);
        if let Some(value) = &literal {
            self.literals.entry(value.clone()).or_insert(index);
        }
        self.lexical.push(LexicalVariable {
            name: name.to_owned(),
            kind,
            regex,
            literal: literal.is_some(),
            priority: token_priority(rule),
            immediate: is_immediate(rule),
            extra: false,
        });
        Ok(index)
    }

    /// Terminal for a string literal, shared with a named rule of the same literal.
    fn literal(&mut self, value: &str) -> Result<usize, CompileError> {
        if let Some(&index) = self.literals.get(value) {
            return Ok(index);
        }
        self.push_lexical(value, VariableKind::Anonymous, &Rule::String(value.to_owned()))
    }

    /// Hidden terminal for a pattern or token written inside a syntax rule.
    fn inline_token(&mut self, rule: &Rule, owner: &str) -> Result<usize, CompileError> {
        if let Some(&index) = self.inline_tokens.get(rule) {
            return Ok(index);
        }
        let name = format!("{owner}_token{}", self.inline_tokens.len() + 1);
        let index = self.push_lexical(&name, VariableKind::Hidden, rule)?;
        self.inline_tokens.insert(rule.clone(), index);
        Ok(index)
    }

    fn convert(
        &mut self,
        rule: &Rule,
        owner: &str,
        syntax_index: &HashMap<String, usize>,
    ) -> Result<IrRule, CompileError> {
        Ok(match rule {
            Rule::Blank => IrRule::Blank,
            Rule::String(value) => IrRule::Terminal(self.literal(value)?),
            Rule::Pattern { .. } | Rule::Token(_) | Rule::ImmediateToken(_) => {
                IrRule::Terminal(self.inline_token(rule, owner)?)
            }
            Rule::Symbol(name) => match self.lexical_by_name.get(name) {
                Some(&index) => IrRule::Terminal(index),
                None => IrRule::NonTerminal(syntax_index[name]),
            },
            Rule::Seq(members) => IrRule::Seq(
                members
                    .iter()
                    .map(|m| self.convert(m, owner, syntax_index))
                    .collect::<Result<_, _>>()?,
            ),
            Rule::Choice(members) => IrRule::Choice(
                members
                    .iter()
                    .map(|m| self.convert(m, owner, syntax_index))
                    .collect::<Result<_, _>>()?,
            ),
            Rule::Repeat(content) => IrRule::Choice(vec![
                IrRule::Repeat1(self.convert_boxed(content, owner, syntax_index)?),
                IrRule::Blank,
            ]),
            Rule::Repeat1(content) => {
                IrRule::Repeat1(self.convert_boxed(content, owner, syntax_index)?)
            }
            Rule::Field { name, content } => {
                let field = self.fields.intern(name);
                IrRule::Field(field, self.convert_boxed(content, owner, syntax_index)?)
            }
            Rule::Alias {
                content,
                value,
                named,
            } => IrRule::Alias {
                value: value.clone(),
                named: *named,
                content: self.convert_boxed(content, owner, syntax_index)?,
            },
            Rule::Prec { value, content } => IrRule::Prec {
                value: precedence_value(value),
                assoc: None,
                content: self.convert_boxed(content, owner, syntax_index)?,
            },
            Rule::PrecLeft { value, content } => IrRule::Prec {
                value: precedence_value(value),
                assoc: Some(Assoc::Left),
                content: self.convert_boxed(content, owner, syntax_index)?,
            },
            Rule::PrecRight { value, content } => IrRule::Prec {
                value: precedence_value(value),
                assoc: Some(Assoc::Right),
                content: self.convert_boxed(content, owner, syntax_index)?,
            },
            Rule::PrecDynamic { content, .. } | Rule::Reserved { content, .. } => {
                self.convert(content, owner, syntax_index)?
            }
        })
    }

    fn convert_boxed(
        &mut self,
        rule: &Rule,
        owner: &str,
        syntax_index: &HashMap<String, usize>,
    ) -> Result<Box<IrRule>, CompileError> {
        self.convert(rule, owner, syntax_index).map(Box::new)
    }
}

fn precedence_value(value: &Precedence) -> i32 {
    match value {
        Precedence::Integer(n) => *n,
        // Names were resolved while preparing the grammar.
        Precedence::Name(_) => 0,
    }
}

/// Regex source for a lexical rule.
pub(crate) fn to_regex(rule: &Rule, owner: &str) -> Result<String, CompileError> {
    Ok(match rule {
        Rule::Blank => String::new(),
        Rule::String(value) => regex_syntax::escape(value),
        Rule::Pattern { value, flags } => match flags.as_deref() {
            Some(flags) if flags.contains('i') => format!("(?i:{value})"),
            _ => format!("(?:{value})"),
        },
        Rule::Seq(members) => members
            .iter()
            .map(|m| to_regex(m, owner).map(|r| format!("(?:{r})")))
            .collect::<Result<String, _>>()?,
        Rule::Choice(members) => {
            let alternatives = members
                .iter()
                .map(|m| to_regex(m, owner))
                .collect::<Result<Vec<_>, _>>()?;
            format!("(?:{})", alternatives.join("|"))
        }
        Rule::Repeat(content) => format!("(?:{})*", to_regex(content, owner)?),
        Rule::Repeat1(content) => format!("(?:{})+", to_regex(content, owner)?),
        Rule::Token(content)
        | Rule::ImmediateToken(content)
        | Rule::Prec { content, .. }
        | Rule::PrecLeft { content, .. }
        | Rule::PrecRight { content, .. }
        | Rule::PrecDynamic { content, .. }
        | Rule::Reserved { content, .. } => to_regex(content, owner)?,
        Rule::Symbol(_) | Rule::Field { .. } | Rule::Alias { .. } => {
            return Err(CompileError::InvalidToken {
                rule: owner.to_owned(),
            });
        }
    })
}

fn validate_regex(regex: &str, owner: &str) -> Result<(), CompileError> {
    let hir = regex_syntax::Parser::new()
        .parse(regex)
        .map_err(|e| CompileError::InvalidRegex {
            rule: owner.to_owned(),
            message: e.to_string(),
        })?;
    if hir.properties().minimum_len() == Some(0) {
        return Err(CompileError::EmptyToken(owner.to_owned()));
    }
    Ok(())
}

fn literal_value(rule: &Rule) -> Option<String> {
    match rule {
        Rule::String(value) => Some(value.clone()),
        Rule::Token(content)
        | Rule::ImmediateToken(content)
        | Rule::Prec { content, .. }
        | Rule::PrecLeft { content, .. }
        | Rule::PrecRight { content, .. } => literal_value(content),
        _ => None,
    }
}

/// Outermost precedence declared around or directly inside a token.
fn token_priority(rule: &Rule) -> i32 {
    match rule {
        Rule::Prec { value, .. } | Rule::PrecLeft { value, .. } | Rule::PrecRight { value, .. } => {
            precedence_value(value)
        }
        Rule::Token(content) | Rule::ImmediateToken(content) => token_priority(content),
        _ => 0,
    }
}

fn is_immediate(rule: &Rule) -> bool {
    match rule {
        Rule::ImmediateToken(_) => true,
        Rule::Prec { content, .. }
        | Rule::PrecLeft { content, .. }
        | Rule::PrecRight { content, .. } => is_immediate(content),
        _ => false,
    }
}

/// Two non-literal tokens with the same definition would be indistinguishable.
fn check_duplicates(lexical: &[LexicalVariable]) -> Result<(), CompileError> {
    let mut seen: HashMap<(&str, i32, bool), &str> = HashMap::new();
    for var in lexical {
        let key = (var.regex.as_str(), var.priority, var.immediate);
        if let Some(first) = seen.insert(key, &var.name) {
            return Err(CompileError::DuplicateTokenKind {
                first: first.to_owned(),
                second: var.name.clone(),
            });
        }
    }
    Ok(())
}

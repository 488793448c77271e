//! Grammar validation and normalization before token extraction.
//!
//! - rejects empty grammars, duplicate rules and external scanners
//! - resolves named precedences to integers
//! - checks that every symbol reference resolves
//! - substitutes `inline` rules into their users
//! - checks that every remaining rule is reachable from the start rule

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use yaral_core::grammar::{Grammar, Precedence, PrecedenceEntry, Rule};

use crate::error::CompileError;

/// Validated grammar with integer precedences and inline rules substituted.
#[derive(Debug, Clone)]
pub(crate) struct PreparedGrammar {
    pub name: String,
    /// Remaining rules in definition order; the first is the start rule.
    pub rules: IndexMap<String, Rule>,
    pub extras: Vec<Rule>,
    pub conflicts: Vec<Vec<String>>,
    pub supertypes: Vec<String>,
    pub word: Option<String>,
}

pub(crate) fn prepare(grammar: &Grammar) -> Result<PreparedGrammar, CompileError> {
    if grammar.rules.is_empty() {
        return Err(CompileError::EmptyGrammar);
    }
    if !grammar.externals.is_empty() {
        return Err(CompileError::UnsupportedExternals);
    }

    let mut rules = IndexMap::new();
    for (name, rule) in &grammar.rules {
        if rules.insert(name.clone(), rule.clone()).is_some() {
            return Err(CompileError::DuplicateRule(name.clone()));
        }
    }

    let levels = precedence_levels(&grammar.precedences);
    for (name, rule) in rules.iter_mut() {
        resolve_precedence(rule, &levels, name)?;
    }
    let mut extras = grammar.extras.clone();
    for extra in &mut extras {
        resolve_precedence(extra, &levels, "extras")?;
    }

    for (name, rule) in &rules {
        check_references(rule, &rules, name)?;
    }
    for extra in &extras {
        check_references(extra, &rules, "extras")?;
    }
    if let Some(word) = &grammar.word
        && !rules.contains_key(word)
    {
        return Err(CompileError::UndefinedRule {
            name: word.clone(),
            referenced_by: "word".to_owned(),
        });
    }

    let start = grammar.rules[0].0.clone();
    let inline: HashSet<&str> = grammar
        .inline
        .iter()
        .map(String::as_str)
        .filter(|name| *name != start)
        .collect();
    let inlined = substitute_inline(&rules, &inline)?;

    let mut extras_out = Vec::with_capacity(extras.len());
    for extra in &extras {
        let mut extra = extra.clone();
        inline_rule(&mut extra, &rules, &inline, &mut Vec::new())?;
        extras_out.push(extra);
    }

    check_reachability(&inlined, &extras_out, grammar.word.as_deref())?;

    Ok(PreparedGrammar {
        name: grammar.name.clone(),
        rules: inlined,
        extras: extras_out,
        conflicts: grammar.conflicts.clone(),
        supertypes: grammar.supertypes.clone(),
        word: grammar.word.clone(),
    })
}

/// Named precedence levels: the first entry of each ordering is the highest.
fn precedence_levels(orderings: &[Vec<PrecedenceEntry>]) -> HashMap<String, i32> {
    let mut levels = HashMap::new();
    for ordering in orderings {
        let names: Vec<&String> = ordering
            .iter()
            .filter_map(|entry| match entry {
                PrecedenceEntry::Name(name) => Some(name),
                PrecedenceEntry::Symbol(_) => None,
            })
            .collect();
        let top = names.len() as i32;
        for (i, name) in names.into_iter().enumerate() {
            levels.entry(name.clone()).or_insert(top - i as i32);
        }
    }
    levels
}

fn resolve_precedence(
    rule: &mut Rule,
    levels: &HashMap<String, i32>,
    owner: &str,
) -> Result<(), CompileError> {
    match rule {
        Rule::Prec { value, content }
        | Rule::PrecLeft { value, content }
        | Rule::PrecRight { value, content } => {
            if let Precedence::Name(name) = value {
                let level = levels.get(name.as_str()).copied().ok_or_else(|| {
                    CompileError::UnknownPrecedence {
                        name: name.clone(),
                        rule: owner.to_owned(),
                    }
                })?;
                *value = Precedence::Integer(level);
            }
            resolve_precedence(content, levels, owner)
        }
        _ => {
            for child in children_mut(rule) {
                resolve_precedence(child, levels, owner)?;
            }
            Ok(())
        }
    }
}

fn check_references(
    rule: &Rule,
    rules: &IndexMap<String, Rule>,
    owner: &str,
) -> Result<(), CompileError> {
    if let Rule::Symbol(name) = rule
        && !rules.contains_key(name)
    {
        return Err(CompileError::UndefinedRule {
            name: name.clone(),
            referenced_by: owner.to_owned(),
        });
    }
    for child in children(rule) {
        check_references(child, rules, owner)?;
    }
    Ok(())
}

fn substitute_inline(
    rules: &IndexMap<String, Rule>,
    inline: &HashSet<&str>,
) -> Result<IndexMap<String, Rule>, CompileError> {
    let mut out = IndexMap::new();
    for (name, rule) in rules {
        if inline.contains(name.as_str()) {
            continue;
        }
        let mut rule = rule.clone();
        inline_rule(&mut rule, rules, inline, &mut Vec::new())?;
        out.insert(name.clone(), rule);
    }
    Ok(out)
}

fn inline_rule(
    rule: &mut Rule,
    rules: &IndexMap<String, Rule>,
    inline: &HashSet<&str>,
    active: &mut Vec<String>,
) -> Result<(), CompileError> {
    if let Rule::Symbol(name) = rule
        && inline.contains(name.as_str())
    {
        if active.contains(name) {
            return Err(CompileError::RecursiveInline(name.clone()));
        }
        let name = name.clone();
        let mut body = rules[&name].clone();
        active.push(name);
        inline_rule(&mut body, rules, inline, active)?;
        active.pop();
        *rule = body;
        return Ok(());
    }
    for child in children_mut(rule) {
        inline_rule(child, rules, inline, active)?;
    }
    Ok(())
}

fn check_reachability(
    rules: &IndexMap<String, Rule>,
    extras: &[Rule],
    word: Option<&str>,
) -> Result<(), CompileError> {
    let mut reached: HashSet<&str> = HashSet::new();
    let mut stack: Vec<&Rule> = Vec::new();

    if let Some((start, rule)) = rules.first() {
        reached.insert(start.as_str());
        stack.push(rule);
    }
    if let Some(word) = word
        && let Some((name, rule)) = rules.get_key_value(word)
    {
        reached.insert(name.as_str());
        stack.push(rule);
    }
    stack.extend(extras);

    while let Some(rule) = stack.pop() {
        if let Rule::Symbol(name) = rule
            && let Some((key, target)) = rules.get_key_value(name)
            && reached.insert(key.as_str())
        {
            stack.push(target);
        }
        stack.extend(children(rule));
    }

    match rules.keys().find(|name| !reached.contains(name.as_str())) {
        Some(name) => Err(CompileError::UnreachableRule(name.clone())),
        None => Ok(()),
    }
}

/// Direct sub-rules.
pub(crate) fn children(rule: &Rule) -> Vec<&Rule> {
    match rule {
        Rule::Blank | Rule::String(_) | Rule::Pattern { .. } | Rule::Symbol(_) => Vec::new(),
        Rule::Seq(members) | Rule::Choice(members) => members.iter().collect(),
        Rule::Repeat(content)
        | Rule::Repeat1(content)
        | Rule::Token(content)
        | Rule::ImmediateToken(content)
        | Rule::Field { content, .. }
        | Rule::Alias { content, .. }
        | Rule::Prec { content, .. }
        | Rule::PrecLeft { content, .. }
        | Rule::PrecRight { content, .. }
        | Rule::PrecDynamic { content, .. }
        | Rule::Reserved { content, .. } => vec![content.as_ref()],
    }
}

fn children_mut(rule: &mut Rule) -> Vec<&mut Rule> {
    match rule {
        Rule::Blank | Rule::String(_) | Rule::Pattern { .. } | Rule::Symbol(_) => Vec::new(),
        Rule::Seq(members) | Rule::Choice(members) => members.iter_mut().collect(),
        Rule::Repeat(content)
        | Rule::Repeat1(content)
        | Rule::Token(content)
        | Rule::ImmediateToken(content)
        | Rule::Field { content, .. }
        | Rule::Alias { content, .. }
        | Rule::Prec { content, .. }
        | Rule::PrecLeft { content, .. }
        | Rule::PrecRight { content, .. }
        | Rule::PrecDynamic { content, .. }
        | Rule::Reserved { content, .. } => vec![content.as_mut()],
    }
}

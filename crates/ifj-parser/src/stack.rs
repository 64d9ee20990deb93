//! Working stack of the shift-reduce parser.

use ifj_syntax::token::Token;

use crate::precedence::EClass;
use crate::types::ValueType;

#[derive(Debug, Clone, PartialEq)]
pub enum StackItem<'t> {
    /// A shifted input token.
    Terminal(&'t Token),
    /// Start of a handle, `<`.
    Open,
    /// A reduced subexpression and its type.
    NonTerminal(ValueType),
}

impl StackItem<'_> {
    pub fn describe(&self) -> String {
        match self {
            StackItem::Terminal(t) => t.kind.name().to_string(),
            StackItem::Open => "<".to_string(),
            StackItem::NonTerminal(t) => format!("E:{}", t),
        }
    }
}

#[derive(Debug, Default)]
pub struct ParseStack<'t> {
    items: Vec<StackItem<'t>>,
}

impl<'t> ParseStack<'t> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: StackItem<'t>) {
        self.items.push(item);
    }

    pub fn pop(&mut self) -> Option<StackItem<'t>> {
        self.items.pop()
    }

    pub fn top(&self) -> Option<&StackItem<'t>> {
        self.items.last()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The terminal nearest to the top, with its index.
    pub fn find_terminal(&self) -> Option<(usize, &'t Token)> {
        self.items.iter().enumerate().rev().find_map(|(i, item)| match item {
            StackItem::Terminal(t) => Some((i, *t)),
            _ => None,
        })
    }

    /// Class of the nearest terminal; the bottom of the stack counts as `$`.
    pub fn terminal_class(&self) -> EClass {
        self.find_terminal()
            .map_or(EClass::EndMarker, |(_, t)| EClass::of(&t.kind))
    }

    /// Insert an open marker just above the item at `index`, or at the
    /// bottom when there is no such item.
    pub fn insert_open(&mut self, index: Option<usize>) {
        let at = index.map_or(0, |i| i + 1);
        self.items.insert(at, StackItem::Open);
    }

    /// The final result once the input is exhausted: exactly one reduced
    /// expression.
    pub fn result(&self) -> Option<ValueType> {
        match self.items.as_slice() {
            [StackItem::NonTerminal(t)] => Some(*t),
            _ => None,
        }
    }

    pub fn dump(&self) -> String {
        let parts: Vec<String> = self.items.iter().map(StackItem::describe).collect();
        format!("$ {}", parts.join(" "))
    }
}

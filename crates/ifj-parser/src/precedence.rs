//! Grammar term classes and the operator-precedence relation table.

use ifj_syntax::token::TokenKind;

/// Class of a token as seen by the precedence table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EClass {
    MulDiv,
    AddSub,
    Not,
    AndOr,
    LtGt,
    Eql,
    LeftBracket,
    RightBracket,
    Value,
    /// Anything that cannot continue an expression, written `$`.
    EndMarker,
}

impl EClass {
    pub fn of(kind: &TokenKind) -> EClass {
        match kind {
            TokenKind::Mul | TokenKind::Div => EClass::MulDiv,
            TokenKind::Add | TokenKind::Sub => EClass::AddSub,
            TokenKind::Not => EClass::Not,
            TokenKind::And | TokenKind::Or => EClass::AndOr,
            TokenKind::Lt | TokenKind::Gt | TokenKind::Lte | TokenKind::Gte => EClass::LtGt,
            TokenKind::Eql | TokenKind::Neq => EClass::Eql,
            TokenKind::LBracket => EClass::LeftBracket,
            TokenKind::RBracket => EClass::RightBracket,
            TokenKind::Integer(_)
            | TokenKind::Float(_)
            | TokenKind::String(_)
            | TokenKind::Ident(_)
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Nil => EClass::Value,
            _ => EClass::EndMarker,
        }
    }

    /// Whether tokens of this class are operators.
    pub fn is_operator(self) -> bool {
        matches!(
            self,
            EClass::MulDiv | EClass::AddSub | EClass::Not | EClass::AndOr | EClass::LtGt | EClass::Eql
        )
    }
}

/// Action between the nearest stack terminal and the lookahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// Shift after inserting an open marker, `<`
    Open,
    /// Reduce, `>`
    Close,
    /// Shift without a marker, `=`
    Equal,
    /// No relation: the expression ends or is malformed
    Empty,
}

const O: Relation = Relation::Open;
const C: Relation = Relation::Close;
const Q: Relation = Relation::Equal;
const X: Relation = Relation::Empty;

// rows: stack class, columns: lookahead class, both in `EClass` order
#[rustfmt::skip]
const TABLE: [[Relation; 10]; 10] = [
    //  *   +   !   &   <   ==  (   )   i   $
    [   C,  C,  X,  C,  C,  C,  O,  C,  O,  C ], // MulDiv
    [   O,  C,  X,  C,  C,  C,  O,  C,  O,  C ], // AddSub
    [   O,  O,  O,  C,  O,  O,  O,  C,  O,  C ], // Not
    [   O,  O,  O,  O,  O,  O,  O,  C,  O,  C ], // AndOr
    [   O,  O,  O,  C,  X,  C,  O,  C,  O,  C ], // LtGt
    [   O,  O,  O,  C,  O,  X,  O,  C,  O,  C ], // Eql
    [   O,  O,  O,  O,  O,  O,  O,  Q,  O,  X ], // LeftBracket
    [   C,  C,  X,  C,  C,  C,  X,  C,  X,  C ], // RightBracket
    [   C,  C,  X,  C,  C,  C,  X,  C,  X,  C ], // Value
    [   O,  O,  O,  O,  O,  O,  O,  X,  O,  X ], // EndMarker
];

pub fn relation(stack: EClass, look: EClass) -> Relation {
    TABLE[stack as usize][look as usize]
}

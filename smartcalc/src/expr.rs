//! Integer expression lexer, AST, parser, and evaluator.
//!
//! Evaluates the canonical form produced by
//! [`preprocess`](crate::preprocess): integer literals, parentheses, and the
//! operators `+ - *`, `//` (integer division) and `**` (power).  A bare `/` or
//! `^` is not part of the canonical form and is rejected.
//!
//! Operator precedence (lowest → highest):
//!   additive  →  multiplicative  →  unary  →  power  →  primary
//!
//! Power is right-associative and binds tighter than a unary sign on its
//! left, so `-2 ** 2` is `-4`.  All arithmetic is checked `i64`.

// ── EvalError ─────────────────────────────────────────────────────────────────

/// Why an expression could not be evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// Nothing but whitespace.
    Empty,
    /// A character outside the canonical alphabet.
    UnexpectedChar(char),
    /// A token in a position the grammar does not allow.
    UnexpectedToken(String),
    UnbalancedParens,
    /// Nesting deeper than [`MAX_DEPTH`].
    TooDeep,
    DivisionByZero,
    NegativeExponent,
    Overflow,
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalError::Empty => write!(f, "empty expression"),
            EvalError::UnexpectedChar(c) => write!(f, "unexpected character {c:?}"),
            EvalError::UnexpectedToken(t) => write!(f, "unexpected {t}"),
            EvalError::UnbalancedParens => write!(f, "unbalanced parentheses"),
            EvalError::TooDeep => write!(f, "expression nested too deeply"),
            EvalError::DivisionByZero => write!(f, "division by zero"),
            EvalError::NegativeExponent => write!(f, "negative exponent"),
            EvalError::Overflow => write!(f, "integer overflow"),
        }
    }
}

impl std::error::Error for EvalError {}

impl From<EvalError> for crate::error::CalcError {
    fn from(_: EvalError) -> Self {
        crate::error::CalcError::InvalidExpression
    }
}

/// Maximum nesting of parentheses and unary signs.
pub const MAX_DEPTH: usize = 256;

// ── Token ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Int(i64),
    Plus,
    Minus,
    Star,
    /// `**`
    StarStar,
    /// `//`
    SlashSlash,
    LParen,
    RParen,
    Eof,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Int(n) => write!(f, "number {n}"),
            Token::Plus => write!(f, "'+'"),
            Token::Minus => write!(f, "'-'"),
            Token::Star => write!(f, "'*'"),
            Token::StarStar => write!(f, "'**'"),
            Token::SlashSlash => write!(f, "'//'"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::Eof => write!(f, "end of input"),
        }
    }
}

// ── Lexer ─────────────────────────────────────────────────────────────────────

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Lexer { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn eat(&mut self, ch: char) -> bool {
        if self.peek() == Some(ch) {
            self.pos += ch.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn read_number(&mut self, start: usize) -> Result<Token, EvalError> {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        self.src[start..self.pos]
            .parse()
            .map(Token::Int)
            .map_err(|_| EvalError::Overflow)
    }

    fn next_token(&mut self) -> Result<Token, EvalError> {
        self.skip_ws();
        let start = self.pos;
        let Some(ch) = self.advance() else {
            return Ok(Token::Eof);
        };

        Ok(match ch {
            '0'..='9' => return self.read_number(start),
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => {
                if self.eat('*') {
                    Token::StarStar
                } else {
                    Token::Star
                }
            }
            '/' => {
                if self.eat('/') {
                    Token::SlashSlash
                } else {
                    return Err(EvalError::UnexpectedChar('/'));
                }
            }
            '(' => Token::LParen,
            ')' => Token::RParen,
            c => return Err(EvalError::UnexpectedChar(c)),
        })
    }

    fn tokenize(mut self) -> Result<Vec<Token>, EvalError> {
        let mut tokens = Vec::new();
        loop {
            let t = self.next_token()?;
            let done = matches!(t, Token::Eof);
            tokens.push(t);
            if done {
                break;
            }
        }
        Ok(tokens)
    }
}

// ── AST ───────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    IntDiv,
    Pow,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(i64),
    Neg(Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    /// A left-associative run `first op e op e ...` at one precedence level.
    /// Kept flat so tree height only grows with nesting, never with length.
    Chain(Box<Expr>, Vec<(BinOp, Expr)>),
}

// ── Parser ────────────────────────────────────────────────────────────────────

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, pos: 0, depth: 0 }
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) -> Token {
        let t = self.tokens.get(self.pos).cloned().unwrap_or(Token::Eof);
        self.pos += 1;
        t
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == expected {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    // ── Grammar ───────────────────────────────────────────────────────────────

    fn parse_expr(&mut self) -> Result<Expr, EvalError> {
        if self.peek() == &Token::Eof {
            return Err(EvalError::Empty);
        }
        let expr = self.parse_additive()?;
        match self.peek() {
            Token::Eof => Ok(expr),
            Token::RParen => Err(EvalError::UnbalancedParens),
            other => Err(EvalError::UnexpectedToken(other.to_string())),
        }
    }

    fn parse_additive(&mut self) -> Result<Expr, EvalError> {
        let first = self.parse_multiplicative()?;
        let mut rest = Vec::new();
        loop {
            let op = match self.peek() {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Sub,
                _ => break,
            };
            self.pos += 1;
            rest.push((op, self.parse_multiplicative()?));
        }
        Ok(chain(first, rest))
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, EvalError> {
        let first = self.parse_unary()?;
        let mut rest = Vec::new();
        loop {
            let op = match self.peek() {
                Token::Star => BinOp::Mul,
                Token::SlashSlash => BinOp::IntDiv,
                _ => break,
            };
            self.pos += 1;
            rest.push((op, self.parse_unary()?));
        }
        Ok(chain(first, rest))
    }

    fn parse_unary(&mut self) -> Result<Expr, EvalError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(EvalError::TooDeep);
        }
        let expr = match self.peek() {
            Token::Minus => {
                self.pos += 1;
                self.parse_unary().map(|e| Expr::Neg(Box::new(e)))
            }
            Token::Plus => {
                self.pos += 1;
                self.parse_unary()
            }
            _ => self.parse_power(),
        };
        self.depth -= 1;
        expr
    }

    fn parse_power(&mut self) -> Result<Expr, EvalError> {
        let base = self.parse_primary()?;
        if self.eat(&Token::StarStar) {
            let exp = self.parse_unary()?;
            return Ok(Expr::Binary(BinOp::Pow, Box::new(base), Box::new(exp)));
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Expr, EvalError> {
        match self.advance() {
            Token::Int(n) => Ok(Expr::Literal(n)),
            Token::LParen => {
                let inner = self.parse_additive()?;
                if !self.eat(&Token::RParen) {
                    return Err(EvalError::UnbalancedParens);
                }
                Ok(inner)
            }
            Token::RParen => Err(EvalError::UnbalancedParens),
            other => Err(EvalError::UnexpectedToken(other.to_string())),
        }
    }
}

fn chain(first: Expr, rest: Vec<(BinOp, Expr)>) -> Expr {
    if rest.is_empty() {
        first
    } else {
        Expr::Chain(Box::new(first), rest)
    }
}

/// Parse a canonical expression string into an AST.
pub fn parse_expr(src: &str) -> Result<Expr, EvalError> {
    let tokens = Lexer::new(src).tokenize()?;
    Parser::new(tokens).parse_expr()
}

// ── Evaluator ─────────────────────────────────────────────────────────────────

/// Evaluate an [`Expr`] AST node.
pub fn eval_expr(expr: &Expr) -> Result<i64, EvalError> {
    match expr {
        Expr::Literal(n) => Ok(*n),
        Expr::Neg(inner) => eval_expr(inner)?.checked_neg().ok_or(EvalError::Overflow),
        Expr::Binary(op, lhs, rhs) => {
            let l = eval_expr(lhs)?;
            let r = eval_expr(rhs)?;
            eval_binop(*op, l, r)
        }
        Expr::Chain(first, rest) => rest.iter().try_fold(eval_expr(first)?, |acc, (op, e)| {
            eval_binop(*op, acc, eval_expr(e)?)
        }),
    }
}

fn eval_binop(op: BinOp, l: i64, r: i64) -> Result<i64, EvalError> {
    match op {
        BinOp::Add => l.checked_add(r).ok_or(EvalError::Overflow),
        BinOp::Sub => l.checked_sub(r).ok_or(EvalError::Overflow),
        BinOp::Mul => l.checked_mul(r).ok_or(EvalError::Overflow),
        BinOp::IntDiv => {
            if r == 0 {
                return Err(EvalError::DivisionByZero);
            }
            // Truncates toward zero.
            l.checked_div(r).ok_or(EvalError::Overflow)
        }
        BinOp::Pow => {
            if r < 0 {
                return Err(EvalError::NegativeExponent);
            }
            let exp = u32::try_from(r).map_err(|_| EvalError::Overflow)?;
            l.checked_pow(exp).ok_or(EvalError::Overflow)
        }
    }
}

/// Convenience: parse and evaluate a canonical expression string.
pub fn eval_str(src: &str) -> Result<i64, EvalError> {
    let expr = parse_expr(src)?;
    eval_expr(&expr)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Semantic types and the compatibility rules between them.
//!
//! This module defines the types the checker assigns to declarations and
//! expressions:
//!
//! - Basic types (int, float, bool, char)
//! - Fixed-size arrays of a basic type
//! - Function signatures
//! - `Void` for procedures and statements, `Error` for anything that
//!   failed to type check
//!
//! `Error` absorbs every operation it takes part in without further
//! diagnostics, which keeps one mistake from being reported many times.

use std::fmt::Display;

use crate::ast::expressions::Literal;

/// Size in bytes of a reference to an array passed as a parameter.
pub const REFERENCE_SIZE: u32 = 4;

/// Largest frame, in bytes, a single function may use.
pub const MAX_FRAME_SIZE: u32 = 0x7fff_ffff;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasicType {
    Int,
    Float,
    Bool,
    Char,
}

impl BasicType {
    pub fn size(&self) -> u32 {
        match self {
            BasicType::Int | BasicType::Float => 4,
            BasicType::Bool | BasicType::Char => 1,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, BasicType::Int | BasicType::Float)
    }
}

impl Display for BasicType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BasicType::Int => write!(f, "int"),
            BasicType::Float => write!(f, "float"),
            BasicType::Bool => write!(f, "bool"),
            BasicType::Char => write!(f, "char"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Void,
    Error,
    Basic(BasicType),
    Array {
        element: BasicType,
        size: u32,
    },
    Function {
        parameters: Vec<Type>,
        return_type: Box<Type>,
    },
}

impl Type {
    pub const INT: Type = Type::Basic(BasicType::Int);
    pub const FLOAT: Type = Type::Basic(BasicType::Float);
    pub const BOOL: Type = Type::Basic(BasicType::Bool);
    pub const CHAR: Type = Type::Basic(BasicType::Char);

    pub fn is_error(&self) -> bool {
        matches!(self, Type::Error)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }

    pub fn is_basic(&self) -> bool {
        matches!(self, Type::Basic(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array { .. })
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Type::Function { .. })
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Basic(basic) if basic.is_numeric())
    }

    pub fn as_basic(&self) -> Option<BasicType> {
        match self {
            Type::Basic(basic) => Some(*basic),
            _ => None,
        }
    }

    /// Element type of an array.
    pub fn element(&self) -> Option<Type> {
        match self {
            Type::Array { element, .. } => Some(Type::Basic(*element)),
            _ => None,
        }
    }

    /// Parameter types and return type of a function.
    pub fn signature(&self) -> Option<(&[Type], &Type)> {
        match self {
            Type::Function {
                parameters,
                return_type,
            } => Some((parameters.as_slice(), return_type.as_ref())),
            _ => None,
        }
    }

    /// Whether a value of type `value` can be stored where `self` is
    /// expected, by assignment, parameter passing or return.
    ///
    /// Identical types are compatible and an int widens to a float. Arrays
    /// never convert, not even element-wise. `Error` on either side is
    /// accepted so it causes no further diagnostics.
    pub fn accepts(&self, value: &Type) -> bool {
        if self.is_error() || value.is_error() {
            return true;
        }

        self == value || (*self == Type::FLOAT && *value == Type::INT)
    }

    /// Bytes needed to store a value of this type in a frame.
    pub fn size(&self) -> u32 {
        match self {
            Type::Basic(basic) => basic.size(),
            Type::Array { element, size } => element.size().saturating_mul(*size),
            Type::Void | Type::Error | Type::Function { .. } => 0,
        }
    }

    /// Alignment of a value of this type in a frame.
    pub fn align(&self) -> u32 {
        match self {
            Type::Basic(basic) => basic.size(),
            Type::Array { element, .. } => element.size(),
            Type::Void | Type::Error | Type::Function { .. } => 1,
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Void => write!(f, "void"),
            Type::Error => write!(f, "error"),
            Type::Basic(basic) => write!(f, "{}", basic),
            Type::Array { element, size } => write!(f, "array [{}] of {}", size, element),
            Type::Function {
                parameters,
                return_type,
            } => {
                let parameters = parameters
                    .iter()
                    .map(|parameter| parameter.to_string())
                    .collect::<Vec<String>>()
                    .join(", ");
                write!(f, "function({}) -> {}", parameters, return_type)
            }
        }
    }
}

/// Result type of an arithmetic operation on two numeric operands.
pub fn arithmetic_result(left: BasicType, right: BasicType) -> BasicType {
    if left == BasicType::Float || right == BasicType::Float {
        BasicType::Float
    } else {
        BasicType::Int
    }
}

/// Whether two operands can be compared with an ordering operator.
pub fn comparable(left: &Type, right: &Type) -> bool {
    (left.is_numeric() && right.is_numeric()) || (*left == Type::CHAR && *right == Type::CHAR)
}

/// Whether two operands can be compared for equality.
pub fn equatable(left: &Type, right: &Type) -> bool {
    comparable(left, right) || (*left == Type::BOOL && *right == Type::BOOL)
}

impl From<&Literal> for Type {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Int(_) => Type::INT,
            Literal::Float(_) => Type::FLOAT,
            Literal::Bool(_) => Type::BOOL,
            Literal::Char(_) => Type::CHAR,
        }
    }
}

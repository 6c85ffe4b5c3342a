use lazy_static::lazy_static;
use std::collections::HashMap;

use crate::type_checker::types::BasicType;

use super::expressions::{ArithmeticOp, LogicOp, RelationalOp, UnaryOp};

lazy_static! {
    pub static ref BASIC_TYPE_LOOKUP: HashMap<&'static str, BasicType> = {
        let mut map = HashMap::new();
        map.insert("int", BasicType::Int);
        map.insert("float", BasicType::Float);
        map.insert("bool", BasicType::Bool);
        map.insert("char", BasicType::Char);
        map
    };
    pub static ref ARITHMETIC_LOOKUP: HashMap<&'static str, ArithmeticOp> = {
        let mut map = HashMap::new();
        map.insert("+", ArithmeticOp::Add);
        map.insert("-", ArithmeticOp::Sub);
        map.insert("*", ArithmeticOp::Mul);
        map.insert("/", ArithmeticOp::Div);
        map.insert("%", ArithmeticOp::Mod);
        map
    };
    pub static ref RELATIONAL_LOOKUP: HashMap<&'static str, RelationalOp> = {
        let mut map = HashMap::new();
        map.insert("==", RelationalOp::Equals);
        map.insert("!=", RelationalOp::NotEquals);
        map.insert("<", RelationalOp::Less);
        map.insert("<=", RelationalOp::LessEquals);
        map.insert(">", RelationalOp::Greater);
        map.insert(">=", RelationalOp::GreaterEquals);
        map
    };
    pub static ref LOGIC_LOOKUP: HashMap<&'static str, LogicOp> = {
        let mut map = HashMap::new();
        map.insert("and", LogicOp::And);
        map.insert("or", LogicOp::Or);
        map
    };
    pub static ref UNARY_LOOKUP: HashMap<&'static str, UnaryOp> = {
        let mut map = HashMap::new();
        map.insert("not", UnaryOp::Not);
        map.insert("-", UnaryOp::Minus);
        map.insert("+", UnaryOp::Plus);
        map
    };
}

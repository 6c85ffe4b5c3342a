use crate::{
    ast::expressions::{
        Arithmetic, ArithmeticOp, ArrayAccess, Expr, FunctionCall, Literal, Logic, LogicOp,
        Relational, RelationalOp, Unary, UnaryOp, Value,
    },
    dispatch::dispatch::{dispatch, Node, NodeKind, VisitResult},
    errors::errors::InternalError,
    type_checker::types::Type,
};

use super::{
    compiler::{CodeAttribs, Compiler},
    instructions::{BinOp, Instruction, InstructionList, Operand, UnOp},
};

pub fn gen_value(compiler: &mut Compiler, node: &Value) -> VisitResult<CodeAttribs> {
    let dst = compiler.new_temp();
    let instruction = match node.literal {
        Literal::Int(value) => Instruction::ILoad {
            dst: dst.clone(),
            value,
        },
        Literal::Bool(value) => Instruction::ILoad {
            dst: dst.clone(),
            value: i64::from(value),
        },
        Literal::Float(value) => Instruction::FLoad {
            dst: dst.clone(),
            value,
        },
        Literal::Char(value) => Instruction::ChLoad {
            dst: dst.clone(),
            value,
        },
    };
    Ok(CodeAttribs::value(dst, InstructionList::from(vec![instruction])))
}

/// Evaluates both operands, left first, converting them to `operand_type`.
fn gen_operands(
    compiler: &mut Compiler,
    left: &Expr,
    right: &Expr,
    operand_type: &Type,
) -> VisitResult<(InstructionList, Operand, Operand)> {
    let left_type = compiler.type_of(Node::from(left))?;
    let right_type = compiler.type_of(Node::from(right))?;

    let (mut code, left) = compiler.gen_value(left)?;
    let (right_code, right) = compiler.gen_value(right)?;
    code.append(right_code);

    let left = compiler.coerce(&mut code, left, left_type, operand_type);
    let right = compiler.coerce(&mut code, right, right_type, operand_type);
    Ok((code, left, right))
}

fn binary(
    compiler: &mut Compiler,
    mut code: InstructionList,
    op: BinOp,
    left: Operand,
    right: Operand,
) -> CodeAttribs {
    let dst = compiler.new_temp();
    code.push(Instruction::Binary {
        op,
        dst: dst.clone(),
        left,
        right,
    });
    CodeAttribs::value(dst, code)
}

pub fn gen_arithmetic(compiler: &mut Compiler, node: &Arithmetic) -> VisitResult<CodeAttribs> {
    let result_type = compiler.type_of(Node::Arithmetic(node))?;
    let is_float = *result_type == Type::FLOAT;
    let (code, left, right) = gen_operands(compiler, &node.left, &node.right, result_type)?;

    let op = match (node.operator, is_float) {
        (ArithmeticOp::Add, false) => BinOp::Add,
        (ArithmeticOp::Sub, false) => BinOp::Sub,
        (ArithmeticOp::Mul, false) => BinOp::Mul,
        (ArithmeticOp::Div, false) => BinOp::Div,
        (ArithmeticOp::Add, true) => BinOp::FAdd,
        (ArithmeticOp::Sub, true) => BinOp::FSub,
        (ArithmeticOp::Mul, true) => BinOp::FMul,
        (ArithmeticOp::Div, true) => BinOp::FDiv,
        (ArithmeticOp::Mod, _) => BinOp::Mod,
    };

    Ok(binary(compiler, code, op, left, right))
}

/// Comparisons only exist as `==`, `<` and `<=`; the others are built from
/// them by negating or swapping operands.
pub fn gen_relational(compiler: &mut Compiler, node: &Relational) -> VisitResult<CodeAttribs> {
    let left_type = compiler.type_of(Node::from(node.left.as_ref()))?;
    let right_type = compiler.type_of(Node::from(node.right.as_ref()))?;
    let is_float = *left_type == Type::FLOAT || *right_type == Type::FLOAT;
    let float = Type::FLOAT;
    let operand_type = if is_float { &float } else { left_type };

    let (code, left, right) = gen_operands(compiler, &node.left, &node.right, operand_type)?;

    let (eq, lt, le) = if is_float {
        (BinOp::FEq, BinOp::FLt, BinOp::FLe)
    } else {
        (BinOp::Eq, BinOp::Lt, BinOp::Le)
    };

    let result = match node.operator {
        RelationalOp::Equals => binary(compiler, code, eq, left, right),
        RelationalOp::Less => binary(compiler, code, lt, left, right),
        RelationalOp::LessEquals => binary(compiler, code, le, left, right),
        RelationalOp::Greater => binary(compiler, code, lt, right, left),
        RelationalOp::GreaterEquals => binary(compiler, code, le, right, left),
        RelationalOp::NotEquals => {
            let equals = binary(compiler, code, eq, left, right);
            let (mut code, equals) = equals.into_value(NodeKind::Relational)?;
            let dst = compiler.new_temp();
            code.push(Instruction::Unary {
                op: UnOp::Not,
                dst: dst.clone(),
                src: equals,
            });
            CodeAttribs::value(dst, code)
        }
    };

    Ok(result)
}

/// Both operands are always evaluated.
pub fn gen_logic(compiler: &mut Compiler, node: &Logic) -> VisitResult<CodeAttribs> {
    let (code, left, right) = gen_operands(compiler, &node.left, &node.right, &Type::BOOL)?;
    let op = match node.operator {
        LogicOp::And => BinOp::And,
        LogicOp::Or => BinOp::Or,
    };
    Ok(binary(compiler, code, op, left, right))
}

pub fn gen_unary(compiler: &mut Compiler, node: &Unary) -> VisitResult<CodeAttribs> {
    let operand_type = compiler.type_of(Node::from(node.operand.as_ref()))?;
    let (mut code, operand) = compiler.gen_value(&node.operand)?;

    let op = match node.operator {
        UnaryOp::Plus => return Ok(CodeAttribs::value(operand, code)),
        UnaryOp::Not => UnOp::Not,
        UnaryOp::Minus if *operand_type == Type::FLOAT => UnOp::FNeg,
        UnaryOp::Minus => UnOp::Neg,
    };

    let dst = compiler.new_temp();
    code.push(Instruction::Unary {
        op,
        dst: dst.clone(),
        src: operand,
    });
    Ok(CodeAttribs::value(dst, code))
}

pub fn gen_array_access(compiler: &mut Compiler, node: &ArrayAccess) -> VisitResult<CodeAttribs> {
    let element = compiler.type_of(Node::ArrayAccess(node))?;
    let (mut code, address) = compiler.element_address(&node.base, &node.index, element)?;

    let dst = compiler.new_temp();
    code.push(Instruction::LoadIndirect {
        dst: dst.clone(),
        address,
    });
    Ok(CodeAttribs::value(dst, code))
}

/// Lowers a call. The result is kept in a fresh temporary when `used`, and
/// dropped from the stack otherwise.
pub fn gen_function_call(
    compiler: &mut Compiler,
    node: &FunctionCall,
    used: bool,
) -> VisitResult<CodeAttribs> {
    let signature = compiler.type_of(Node::Ident(&node.callee))?;
    let (parameters, return_type) =
        signature
            .signature()
            .ok_or(InternalError::MissingDecoration {
                kind: NodeKind::Ident,
                id: node.callee.id.0,
            })?;
    let returns_value = !return_type.is_void();

    let mut code = InstructionList::new();
    if returns_value {
        code.push(Instruction::Push(None));
    }

    for (parameter, argument) in parameters.iter().zip(node.arguments.iter()) {
        let value = if parameter.is_array() {
            let ident = match argument.value.peel_parentheses() {
                Expr::Ident(ident) => ident,
                other => {
                    return Err(InternalError::NotAddressable {
                        kind: Node::from(other).kind(),
                    })
                }
            };
            let (address_code, address) = compiler.array_address(ident)?;
            code.append(address_code);
            address
        } else {
            let argument_type = compiler.type_of(Node::Paramexp(argument))?;
            let (argument_code, value) =
                dispatch(compiler, Node::Paramexp(argument))?.into_value(NodeKind::Paramexp)?;
            code.append(argument_code);
            compiler.coerce(&mut code, value, argument_type, parameter)
        };
        code.push(Instruction::Push(Some(value)));
    }

    code.push(Instruction::Call(node.callee.name.clone()));
    for _ in node.arguments.iter() {
        code.push(Instruction::Pop(None));
    }

    if !returns_value {
        return Ok(CodeAttribs::code(code));
    }
    if !used {
        code.push(Instruction::Pop(None));
        return Ok(CodeAttribs::code(code));
    }

    let result = compiler.new_temp();
    code.push(Instruction::Pop(Some(result.clone())));
    Ok(CodeAttribs::value(result, code))
}

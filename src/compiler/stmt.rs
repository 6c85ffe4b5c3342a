use crate::{
    ast::{
        expressions::Expr,
        statements::{
            AssignStmt, IfStmt, LeftExpr, ProcCall, ReadStmt, ReturnStmt, WhileStmt, WriteExpr,
        },
    },
    dispatch::dispatch::{dispatch, Node, NodeKind, VisitResult},
    errors::errors::InternalError,
    type_checker::types::Type,
    MK_INSTRUCTIONS,
};

use super::{
    compiler::{CodeAttribs, Compiler},
    expr::gen_function_call,
    instructions::{BinOp, Instruction, InstructionList, Operand},
};

/// The storage an assignment or read writes to. `addr` is an address when
/// `indirect` is set.
pub fn gen_left_expr(compiler: &mut Compiler, node: &LeftExpr) -> VisitResult<CodeAttribs> {
    match &node.index {
        None => Ok(CodeAttribs::value(
            Operand::Var(node.ident.name.clone()),
            InstructionList::new(),
        )),
        Some(index) => {
            let element = compiler.type_of(Node::LeftExpr(node))?;
            let (code, address) = compiler.element_address(&node.ident, index, element)?;
            Ok(CodeAttribs {
                addr: Some(address),
                indirect: true,
                code,
            })
        }
    }
}

pub fn gen_assign_stmt(compiler: &mut Compiler, node: &AssignStmt) -> VisitResult<CodeAttribs> {
    let target_type = compiler.type_of(Node::LeftExpr(&node.left))?;
    if target_type.is_array() {
        return gen_array_copy(compiler, node, target_type);
    }

    let target = dispatch(compiler, Node::LeftExpr(&node.left))?;
    let indirect = target.indirect;
    let (mut code, destination) = target.into_value(NodeKind::LeftExpr)?;

    let value_type = compiler.type_of(Node::from(&node.value))?;
    let (value_code, value) = compiler.gen_value(&node.value)?;
    code.append(value_code);
    let value = compiler.coerce(&mut code, value, value_type, target_type);

    if indirect {
        code.push(Instruction::StoreIndirect {
            address: destination,
            src: value,
        });
    } else {
        code.push(Instruction::Load {
            dst: destination,
            src: value,
        });
    }

    Ok(CodeAttribs::code(code))
}

/// `a = b` between two arrays copies every element.
fn gen_array_copy(
    compiler: &mut Compiler,
    node: &AssignStmt,
    array_type: &Type,
) -> VisitResult<CodeAttribs> {
    let (size, element) = match array_type {
        Type::Array { size, element } => (*size, *element),
        _ => {
            return Err(InternalError::NotAddressable {
                kind: NodeKind::AssignStmt,
            })
        }
    };
    let source = match node.value.peel_parentheses() {
        Expr::Ident(ident) => ident,
        other => {
            return Err(InternalError::NotAddressable {
                kind: Node::from(other).kind(),
            })
        }
    };

    let (mut code, destination) = compiler.array_address(&node.left.ident)?;
    let (source_code, source) = compiler.array_address(source)?;
    code.append(source_code);

    let label = compiler.new_label();
    let top = format!("copy{}", label);
    let end = format!("endcopy{}", label);

    let counter = compiler.new_temp();
    let length = compiler.new_temp();
    let element_size = compiler.new_temp();
    let one = compiler.new_temp();
    let in_bounds = compiler.new_temp();
    let offset = compiler.new_temp();
    let from = compiler.new_temp();
    let to = compiler.new_temp();
    let value = compiler.new_temp();

    code.append(MK_INSTRUCTIONS![
        Instruction::ILoad {
            dst: counter.clone(),
            value: 0,
        },
        Instruction::ILoad {
            dst: length.clone(),
            value: i64::from(size),
        },
        Instruction::ILoad {
            dst: element_size.clone(),
            value: i64::from(element.size()),
        },
        Instruction::ILoad {
            dst: one.clone(),
            value: 1,
        },
        Instruction::Label(top.clone()),
        Instruction::Binary {
            op: BinOp::Lt,
            dst: in_bounds.clone(),
            left: counter.clone(),
            right: length,
        },
        Instruction::JumpIfFalse {
            condition: in_bounds,
            label: end.clone(),
        },
        Instruction::Binary {
            op: BinOp::Mul,
            dst: offset.clone(),
            left: counter.clone(),
            right: element_size,
        },
        Instruction::Binary {
            op: BinOp::Add,
            dst: from.clone(),
            left: source,
            right: offset.clone(),
        },
        Instruction::Binary {
            op: BinOp::Add,
            dst: to.clone(),
            left: destination,
            right: offset,
        },
        Instruction::LoadIndirect {
            dst: value.clone(),
            address: from,
        },
        Instruction::StoreIndirect {
            address: to,
            src: value,
        },
        Instruction::Binary {
            op: BinOp::Add,
            dst: counter.clone(),
            left: counter,
            right: one,
        },
        Instruction::Jump(top),
        Instruction::Label(end),
    ]);

    Ok(CodeAttribs::code(code))
}

pub fn gen_if_stmt(compiler: &mut Compiler, node: &IfStmt) -> VisitResult<CodeAttribs> {
    let label = compiler.new_label();
    let else_label = format!("else{}", label);
    let end_label = format!("endif{}", label);

    let (mut code, condition) = compiler.gen_value(&node.condition)?;
    let then_code = dispatch(compiler, Node::Statements(&node.then_body))?.code;

    match &node.else_body {
        None => {
            code.push(Instruction::JumpIfFalse {
                condition,
                label: end_label.clone(),
            });
            code.append(then_code);
        }
        Some(else_body) => {
            let else_code = dispatch(compiler, Node::Statements(else_body))?.code;
            code.push(Instruction::JumpIfFalse {
                condition,
                label: else_label.clone(),
            });
            code.append(then_code);
            code.push(Instruction::Jump(end_label.clone()));
            code.push(Instruction::Label(else_label));
            code.append(else_code);
        }
    }
    code.push(Instruction::Label(end_label));

    Ok(CodeAttribs::code(code))
}

pub fn gen_while_stmt(compiler: &mut Compiler, node: &WhileStmt) -> VisitResult<CodeAttribs> {
    let label = compiler.new_label();
    let top = format!("while{}", label);
    let end = format!("endwhile{}", label);

    let mut code = MK_INSTRUCTIONS![Instruction::Label(top.clone())];
    let (condition_code, condition) = compiler.gen_value(&node.condition)?;
    code.append(condition_code);
    code.push(Instruction::JumpIfFalse {
        condition,
        label: end.clone(),
    });
    code.append(dispatch(compiler, Node::Statements(&node.body))?.code);
    code.push(Instruction::Jump(top));
    code.push(Instruction::Label(end));

    Ok(CodeAttribs::code(code))
}

pub fn gen_proc_call(compiler: &mut Compiler, node: &ProcCall) -> VisitResult<CodeAttribs> {
    let call = gen_function_call(compiler, &node.call, false)?;
    Ok(CodeAttribs::code(call.code))
}

pub fn gen_return_stmt(compiler: &mut Compiler, node: &ReturnStmt) -> VisitResult<CodeAttribs> {
    let value = match &node.value {
        None => return Ok(CodeAttribs::code(MK_INSTRUCTIONS![Instruction::Return(None)])),
        Some(value) => value,
    };

    let value_type = compiler.type_of(Node::from(value))?;
    let return_type = compiler.current_return.map(Type::Basic).unwrap_or(Type::Void);
    let (mut code, result) = compiler.gen_value(value)?;
    let result = compiler.coerce(&mut code, result, value_type, &return_type);
    code.push(Instruction::Return(Some(result)));

    Ok(CodeAttribs::code(code))
}

pub fn gen_read_stmt(compiler: &mut Compiler, node: &ReadStmt) -> VisitResult<CodeAttribs> {
    let ty = compiler
        .type_of(Node::LeftExpr(&node.target))?
        .as_basic()
        .ok_or(InternalError::MissingOperand {
            kind: NodeKind::ReadStmt,
        })?;

    let target = dispatch(compiler, Node::LeftExpr(&node.target))?;
    let indirect = target.indirect;
    let (mut code, destination) = target.into_value(NodeKind::LeftExpr)?;

    if indirect {
        let value = compiler.new_temp();
        code.push(Instruction::Read {
            ty,
            dst: value.clone(),
        });
        code.push(Instruction::StoreIndirect {
            address: destination,
            src: value,
        });
    } else {
        code.push(Instruction::Read {
            ty,
            dst: destination,
        });
    }

    Ok(CodeAttribs::code(code))
}

pub fn gen_write_expr(compiler: &mut Compiler, node: &WriteExpr) -> VisitResult<CodeAttribs> {
    let ty = compiler
        .type_of(Node::from(&node.value))?
        .as_basic()
        .ok_or(InternalError::MissingOperand {
            kind: NodeKind::WriteExpr,
        })?;

    let (mut code, value) = compiler.gen_value(&node.value)?;
    code.push(Instruction::Write { ty, src: value });

    Ok(CodeAttribs::code(code))
}

//! Main code generation module.
//!
//! This module contains the Compiler structure, which walks a checked tree
//! and lowers every function into a [`Subroutine`] of abstract instructions.
//! All typing decisions are read from the checker's decorations; the
//! generator never re-derives a type.

use log::debug;

use crate::{
    ast::{
        ast::{Function, Program},
        expressions::{
            ActualParameter, Arithmetic, ArrayAccess, Expr, FunctionCall, Ident, Logic,
            Parenthesis, Relational, Unary, Value,
        },
        statements::{
            AssignStmt, IfStmt, LeftExpr, ProcCall, ReadStmt, ReturnStmt, Statements, WhileStmt,
            WriteExpr, WriteString,
        },
    },
    dispatch::dispatch::{dispatch, Node, NodeKind, VisitResult, Visitor},
    errors::errors::{CompileError, InternalError},
    type_checker::{
        decorations::{CheckedProgram, Decorations},
        symbol_table::{Scope, Symbol, SymbolTable},
        types::{BasicType, Type},
    },
    MK_INSTRUCTIONS,
};

use super::{
    expr::{
        gen_arithmetic, gen_array_access, gen_function_call, gen_logic, gen_relational,
        gen_unary, gen_value,
    },
    instructions::{BinOp, Code, Instruction, InstructionList, Operand, Slot, Subroutine},
    stmt::{
        gen_assign_stmt, gen_if_stmt, gen_left_expr, gen_proc_call, gen_read_stmt,
        gen_return_stmt, gen_while_stmt, gen_write_expr,
    },
};

/// What a handler produces: the code computing the node and, for
/// expressions, where the result lives.
///
/// When `indirect` is set, `addr` holds the address of the storage rather
/// than the value itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodeAttribs {
    pub addr: Option<Operand>,
    pub indirect: bool,
    pub code: InstructionList,
}

impl CodeAttribs {
    pub fn code(code: InstructionList) -> Self {
        CodeAttribs {
            addr: None,
            indirect: false,
            code,
        }
    }

    pub fn value(addr: Operand, code: InstructionList) -> Self {
        CodeAttribs {
            addr: Some(addr),
            indirect: false,
            code,
        }
    }

    /// Splits into code and result operand; the node must have a value.
    pub fn into_value(self, kind: NodeKind) -> VisitResult<(InstructionList, Operand)> {
        match self.addr {
            Some(addr) => Ok((self.code, addr)),
            None => Err(InternalError::MissingOperand { kind }),
        }
    }
}

/// The main compiler structure that holds the state of code generation.
///
/// One instance lowers one checked program. Labels are numbered across the
/// whole program, temporaries restart at zero in every subroutine.
pub struct Compiler<'a> {
    /// Types and l-value flags recorded by the checker
    pub decorations: &'a Decorations,
    /// The checker's scopes, re-activated function by function
    pub symbols: SymbolTable,
    /// Return type of the function being lowered
    pub current_return: Option<BasicType>,

    label_counter: u32,
    temp_counter: u32,
    subroutines: Vec<Subroutine>,
}

impl<'a> Compiler<'a> {
    pub fn new(checked: &'a CheckedProgram) -> Self {
        Compiler {
            decorations: &checked.decorations,
            symbols: checked.symbols.clone(),
            current_return: None,
            label_counter: 0,
            temp_counter: 0,
            subroutines: vec![],
        }
    }

    /// A fresh temporary of the current subroutine.
    pub fn new_temp(&mut self) -> Operand {
        let temp = Operand::Temp(self.temp_counter);
        self.temp_counter += 1;
        temp
    }

    /// A fresh label number, never handed out twice in one compilation.
    pub fn new_label(&mut self) -> u32 {
        let label = self.label_counter;
        self.label_counter += 1;
        label
    }

    pub fn type_of(&self, node: Node<'_>) -> VisitResult<&'a Type> {
        self.decorations
            .get_type(node.id())
            .ok_or(InternalError::MissingDecoration {
                kind: node.kind(),
                id: node.id().0,
            })
    }

    pub fn lookup(&self, name: &str) -> VisitResult<&Symbol> {
        Ok(self.symbols.lookup(name)?)
    }

    /// Evaluates an expression for its value.
    pub fn gen_value(&mut self, expr: &Expr) -> VisitResult<(InstructionList, Operand)> {
        let kind = Node::from(expr).kind();
        dispatch(self, expr)?.into_value(kind)
    }

    /// Converts `value` from type `from` to type `to` when an int is used
    /// where a float is expected.
    pub fn coerce(
        &mut self,
        code: &mut InstructionList,
        value: Operand,
        from: &Type,
        to: &Type,
    ) -> Operand {
        if *to == Type::FLOAT && *from == Type::INT {
            let converted = self.new_temp();
            code.push(Instruction::Float {
                dst: converted.clone(),
                src: value,
            });
            converted
        } else {
            value
        }
    }

    /// Address of the first element of the array named by `ident`.
    ///
    /// An array parameter already holds the address of the caller's array;
    /// a local array has its address taken.
    pub fn array_address(&mut self, ident: &Ident) -> VisitResult<(InstructionList, Operand)> {
        if self.lookup(&ident.name)?.is_array_reference() {
            return Ok((InstructionList::new(), Operand::Var(ident.name.clone())));
        }

        let address = self.new_temp();
        let code = MK_INSTRUCTIONS![Instruction::AddressOf {
            dst: address.clone(),
            var: ident.name.clone(),
        }];
        Ok((code, address))
    }

    /// Address of `base[index]`.
    pub fn element_address(
        &mut self,
        base: &Ident,
        index: &Expr,
        element: &Type,
    ) -> VisitResult<(InstructionList, Operand)> {
        let (mut code, base_address) = self.array_address(base)?;
        let (index_code, index) = self.gen_value(index)?;
        code.append(index_code);

        let size = self.new_temp();
        let offset = self.new_temp();
        let address = self.new_temp();
        code.append(MK_INSTRUCTIONS![
            Instruction::ILoad {
                dst: size.clone(),
                value: i64::from(element.size()),
            },
            Instruction::Binary {
                op: BinOp::Mul,
                dst: offset.clone(),
                left: index,
                right: size,
            },
            Instruction::Binary {
                op: BinOp::Add,
                dst: address.clone(),
                left: base_address,
                right: offset,
            },
        ]);
        Ok((code, address))
    }

    fn slots<'s>(symbols: impl Iterator<Item = &'s Symbol>) -> Vec<Slot> {
        symbols
            .map(|symbol| Slot {
                name: symbol.name.clone(),
                ty: symbol.symbol_type.clone(),
                offset: symbol.offset.unwrap_or_default(),
                size: symbol.storage_size(),
            })
            .collect()
    }

    fn frame(&self, function: &Function) -> VisitResult<&Scope> {
        let missing = InternalError::MissingDecoration {
            kind: NodeKind::Function,
            id: function.id.0,
        };
        let scope = self.decorations.get_scope(function.id).ok_or(missing.clone())?;
        self.symbols.scope(scope).ok_or(missing)
    }
}

impl Visitor for Compiler<'_> {
    type Output = CodeAttribs;
    const PASS: &'static str = "code generation";

    fn visit_program(&mut self, node: &Program) -> VisitResult<CodeAttribs> {
        let global = self
            .decorations
            .get_scope(node.id)
            .ok_or(InternalError::MissingDecoration {
                kind: NodeKind::Program,
                id: node.id.0,
            })?;

        self.symbols.push_this_scope(global);
        for function in node.functions.iter() {
            dispatch(self, Node::Function(function))?;
        }
        self.symbols.close_scope();

        Ok(CodeAttribs::default())
    }

    fn visit_function(&mut self, node: &Function) -> VisitResult<CodeAttribs> {
        debug!("generating code for {}", node.name.name);
        let signature = self.type_of(Node::Function(node))?;
        self.current_return = signature
            .signature()
            .and_then(|(_, return_type)| return_type.as_basic());
        self.temp_counter = 0;

        let frame = self.frame(node)?;
        let parameters = Compiler::slots(frame.parameters());
        let locals = Compiler::slots(frame.variables());
        let frame_size = frame.frame_size();
        let scope = frame.id;

        self.symbols.push_this_scope(scope);
        let body = dispatch(self, Node::Statements(&node.body))?;
        self.symbols.close_scope();

        let mut instructions = body.code;
        instructions.push(Instruction::Return(None));

        self.subroutines.push(Subroutine {
            name: node.name.name.clone(),
            parameters,
            locals,
            returns: self.current_return,
            frame_size,
            instructions,
        });
        self.current_return = None;

        Ok(CodeAttribs::default())
    }

    fn visit_statements(&mut self, node: &Statements) -> VisitResult<CodeAttribs> {
        let mut code = InstructionList::new();
        for statement in node.iter() {
            code.append(dispatch(self, statement)?.code);
        }
        Ok(CodeAttribs::code(code))
    }

    fn visit_assign_stmt(&mut self, node: &AssignStmt) -> VisitResult<CodeAttribs> {
        gen_assign_stmt(self, node)
    }

    fn visit_if_stmt(&mut self, node: &IfStmt) -> VisitResult<CodeAttribs> {
        gen_if_stmt(self, node)
    }

    fn visit_while_stmt(&mut self, node: &WhileStmt) -> VisitResult<CodeAttribs> {
        gen_while_stmt(self, node)
    }

    fn visit_proc_call(&mut self, node: &ProcCall) -> VisitResult<CodeAttribs> {
        gen_proc_call(self, node)
    }

    fn visit_return_stmt(&mut self, node: &ReturnStmt) -> VisitResult<CodeAttribs> {
        gen_return_stmt(self, node)
    }

    fn visit_read_stmt(&mut self, node: &ReadStmt) -> VisitResult<CodeAttribs> {
        gen_read_stmt(self, node)
    }

    fn visit_write_expr(&mut self, node: &WriteExpr) -> VisitResult<CodeAttribs> {
        gen_write_expr(self, node)
    }

    fn visit_write_string(&mut self, node: &WriteString) -> VisitResult<CodeAttribs> {
        Ok(CodeAttribs::code(MK_INSTRUCTIONS![
            Instruction::WriteString(node.text.clone())
        ]))
    }

    fn visit_left_expr(&mut self, node: &LeftExpr) -> VisitResult<CodeAttribs> {
        gen_left_expr(self, node)
    }

    fn visit_function_call(&mut self, node: &FunctionCall) -> VisitResult<CodeAttribs> {
        gen_function_call(self, node, true)
    }

    fn visit_expr_ident(&mut self, node: &Ident) -> VisitResult<CodeAttribs> {
        Ok(CodeAttribs::value(
            Operand::Var(node.name.clone()),
            InstructionList::new(),
        ))
    }

    fn visit_arithmetic(&mut self, node: &Arithmetic) -> VisitResult<CodeAttribs> {
        gen_arithmetic(self, node)
    }

    fn visit_relational(&mut self, node: &Relational) -> VisitResult<CodeAttribs> {
        gen_relational(self, node)
    }

    fn visit_array_access(&mut self, node: &ArrayAccess) -> VisitResult<CodeAttribs> {
        gen_array_access(self, node)
    }

    fn visit_unary(&mut self, node: &Unary) -> VisitResult<CodeAttribs> {
        gen_unary(self, node)
    }

    fn visit_logic(&mut self, node: &Logic) -> VisitResult<CodeAttribs> {
        gen_logic(self, node)
    }

    fn visit_parenthesis(&mut self, node: &Parenthesis) -> VisitResult<CodeAttribs> {
        dispatch(self, node.inner.as_ref())
    }

    fn visit_value(&mut self, node: &Value) -> VisitResult<CodeAttribs> {
        gen_value(self, node)
    }

    fn visit_paramexp(&mut self, node: &ActualParameter) -> VisitResult<CodeAttribs> {
        dispatch(self, &node.value)
    }
}

/// Lowers a checked program to abstract instructions.
///
/// The checked program must carry no error diagnostics; warnings are fine.
pub fn generate(program: &Program, checked: &CheckedProgram) -> Result<Code, CompileError> {
    let count = checked.error_count();
    if count > 0 {
        return Err(CompileError::UnresolvedErrorsPresent { count });
    }

    debug!("generating code for {} functions", program.functions.len());
    let mut compiler = Compiler::new(checked);
    dispatch(&mut compiler, Node::Program(program))?;

    Ok(Code {
        subroutines: compiler.subroutines,
    })
}

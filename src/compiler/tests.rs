//! Unit tests for code generation.
//!
//! This module contains tests for:
//! - Lowering of expressions, including int to float conversions
//! - Control flow labels and jumps
//! - Array element addressing, array parameters and array copies
//! - Call sequences and frame layout
//! - The textual form of instructions

use crate::{
    ast::{
        ast::{Function, Program, VariableDecl},
        builder::TreeBuilder,
        expressions::{ArithmeticOp, LogicOp, RelationalOp, UnaryOp},
        statements::Stmt,
    },
    errors::errors::CompileError,
    type_checker::{
        type_checker::type_check,
        types::{BasicType, Type},
    },
    Config, MK_INSTRUCTIONS,
};

use super::{
    compiler::generate,
    instructions::{BinOp, Code, Instruction, InstructionList, Operand},
};

fn generate_code(program: &Program) -> Code {
    let checked = type_check(program, &Config::default()).unwrap();
    assert!(!checked.has_errors(), "{:?}", checked.diagnostics);
    generate(program, &checked).unwrap()
}

fn listing(code: &Code, name: &str) -> Vec<String> {
    code.subroutine(name)
        .unwrap()
        .instructions
        .iter()
        .map(|instruction| instruction.to_string())
        .collect()
}

fn main_function(b: &mut TreeBuilder, declarations: Vec<VariableDecl>, body: Vec<Stmt>) -> Function {
    b.function("main", vec![], None, declarations, body)
}

fn main_only(b: &mut TreeBuilder, declarations: Vec<VariableDecl>, body: Vec<Stmt>) -> Program {
    let main = main_function(b, declarations, body);
    b.program(vec![main])
}

#[test]
fn test_instruction_display() {
    let add = Instruction::Binary {
        op: BinOp::Add,
        dst: Operand::Temp(2),
        left: Operand::Var(String::from("x")),
        right: Operand::Temp(1),
    };
    assert_eq!(add.to_string(), "ADD %t2 x %t1");
    assert_eq!(Instruction::Push(None).to_string(), "PUSH");
    assert_eq!(
        Instruction::Write {
            ty: BasicType::Float,
            src: Operand::Temp(0)
        }
        .to_string(),
        "WRITEF %t0"
    );
    assert_eq!(
        Instruction::WriteString(String::from("hi")).to_string(),
        "WRITES \"hi\""
    );
    assert_eq!(
        Instruction::ChLoad {
            dst: Operand::Temp(3),
            value: 'z'
        }
        .to_string(),
        "CHLOAD %t3 'z'"
    );
}

#[test]
fn test_instruction_list_append_keeps_order() {
    let mut first = MK_INSTRUCTIONS![Instruction::Label(String::from("top"))];
    let second = InstructionList::from(vec![
        Instruction::Call(String::from("f")),
        Instruction::Jump(String::from("top")),
    ]);
    first.append(second);

    assert_eq!(first.len(), 3);
    assert_eq!(first.last(), Some(&Instruction::Jump(String::from("top"))));
}

#[test]
fn test_gen_function_and_call() {
    let mut b = TreeBuilder::new("test.asl");
    let int = b.basic("int");
    let x = b.parameter("x", int);
    let var_x = b.var("x");
    let one = b.int(1);
    let sum = b.arithmetic(ArithmeticOp::Add, var_x, one);
    let ret = b.return_stmt(Some(sum));
    let f = b.function("f", vec![x], Some("int"), vec![], vec![ret]);
    let three = b.int(3);
    let call = b.proc_call("f", vec![three]);
    let main = main_function(&mut b, vec![], vec![call]);
    let program = b.program(vec![f, main]);

    let code = generate_code(&program);
    assert_eq!(
        listing(&code, "f"),
        vec!["ILOAD %t0 1", "ADD %t1 x %t0", "RETURN %t1", "RETURN"]
    );
    assert_eq!(
        listing(&code, "main"),
        vec!["PUSH", "ILOAD %t0 3", "PUSH %t0", "CALL f", "POP", "POP", "RETURN"]
    );

    let f = code.subroutine("f").unwrap();
    assert_eq!(f.returns, Some(BasicType::Int));
    assert_eq!(f.parameters.len(), 1);
    assert_eq!(f.parameters[0].offset, 0);
    assert_eq!(f.frame_size, 4);
}

#[test]
fn test_gen_call_result_with_conversion() {
    let mut b = TreeBuilder::new("test.asl");
    let float = b.basic("float");
    let x = b.parameter("x", float);
    let var_x = b.var("x");
    let ret = b.return_stmt(Some(var_x));
    let g = b.function("g", vec![x], Some("float"), vec![], vec![ret]);

    let float = b.basic("float");
    let r = b.variable_decl(&["r"], float);
    let target = b.left("r");
    let one = b.int(1);
    let call = b.call("g", vec![one]);
    let assign = b.assign(target, call);
    let main = main_function(&mut b, vec![r], vec![assign]);
    let program = b.program(vec![g, main]);

    let code = generate_code(&program);
    assert_eq!(listing(&code, "g"), vec!["RETURN x", "RETURN"]);
    assert_eq!(
        listing(&code, "main"),
        vec![
            "PUSH",
            "ILOAD %t0 1",
            "FLOAT %t1 %t0",
            "PUSH %t1",
            "CALL g",
            "POP",
            "POP %t2",
            "LOAD r %t2",
            "RETURN"
        ]
    );
}

#[test]
fn test_gen_return_converts_to_float() {
    let mut b = TreeBuilder::new("test.asl");
    let one = b.int(1);
    let ret = b.return_stmt(Some(one));
    let h = b.function("h", vec![], Some("float"), vec![], vec![ret]);
    let main = main_function(&mut b, vec![], vec![]);
    let program = b.program(vec![h, main]);

    let code = generate_code(&program);
    assert_eq!(
        listing(&code, "h"),
        vec!["ILOAD %t0 1", "FLOAT %t1 %t0", "RETURN %t1", "RETURN"]
    );
    assert_eq!(code.subroutine("h").unwrap().returns, Some(BasicType::Float));
}

#[test]
fn test_gen_mixed_arithmetic() {
    let mut b = TreeBuilder::new("test.asl");
    let float = b.basic("float");
    let r = b.variable_decl(&["r"], float);
    let int = b.basic("int");
    let i = b.variable_decl(&["i"], int);
    let target = b.left("r");
    let var_i = b.var("i");
    let half = b.float(1.5);
    let sum = b.arithmetic(ArithmeticOp::Add, var_i, half);
    let assign = b.assign(target, sum);
    let program = main_only(&mut b, vec![r, i], vec![assign]);

    let code = generate_code(&program);
    assert_eq!(
        listing(&code, "main"),
        vec![
            "FLOAD %t0 1.5",
            "FLOAT %t1 i",
            "FADD %t2 %t1 %t0",
            "LOAD r %t2",
            "RETURN"
        ]
    );
}

#[test]
fn test_gen_relational_lowering() {
    let mut b = TreeBuilder::new("test.asl");
    let int = b.basic("int");
    let decl = b.variable_decl(&["x", "y"], int);
    let (x, y) = (b.var("x"), b.var("y"));
    let different = b.relational(RelationalOp::NotEquals, x, y);
    let write_different = b.write_expr(different);
    let (x, y) = (b.var("x"), b.var("y"));
    let greater = b.relational(RelationalOp::GreaterEquals, x, y);
    let write_greater = b.write_expr(greater);
    let program = main_only(&mut b, vec![decl], vec![write_different, write_greater]);

    let code = generate_code(&program);
    assert_eq!(
        listing(&code, "main"),
        vec![
            "EQ %t0 x y",
            "NOT %t1 %t0",
            "WRITEI %t1",
            "LE %t2 y x",
            "WRITEI %t2",
            "RETURN"
        ]
    );
}

#[test]
fn test_gen_logic_and_unary() {
    let mut b = TreeBuilder::new("test.asl");
    let bool_type = b.basic("bool");
    let flags = b.variable_decl(&["p", "q"], bool_type);
    let float = b.basic("float");
    let r = b.variable_decl(&["r"], float);
    let int = b.basic("int");
    let i = b.variable_decl(&["i"], int);

    let (p, q) = (b.var("p"), b.var("q"));
    let both = b.logic(LogicOp::And, p, q);
    let write_both = b.write_expr(both);
    let var_r = b.var("r");
    let negated = b.unary(UnaryOp::Minus, var_r);
    let write_negated = b.write_expr(negated);
    let var_i = b.var("i");
    let positive = b.unary(UnaryOp::Plus, var_i);
    let write_positive = b.write_expr(positive);
    let program = main_only(
        &mut b,
        vec![flags, r, i],
        vec![write_both, write_negated, write_positive],
    );

    let code = generate_code(&program);
    assert_eq!(
        listing(&code, "main"),
        vec![
            "AND %t0 p q",
            "WRITEI %t0",
            "FNEG %t1 r",
            "WRITEF %t1",
            "WRITEI i",
            "RETURN"
        ]
    );
}

#[test]
fn test_gen_if_else_and_while_labels() {
    let mut b = TreeBuilder::new("test.asl");
    let bool_type = b.basic("bool");
    let flag = b.variable_decl(&["b"], bool_type);
    let condition = b.var("b");
    let then_write = b.write_string("a");
    let loop_condition = b.var("b");
    let loop_write = b.write_string("b");
    let while_stmt = b.while_stmt(loop_condition, vec![loop_write]);
    let if_stmt = b.if_stmt(condition, vec![then_write], Some(vec![while_stmt]));
    let program = main_only(&mut b, vec![flag], vec![if_stmt]);

    let code = generate_code(&program);
    assert_eq!(
        listing(&code, "main"),
        vec![
            "FJUMP b else0",
            "WRITES \"a\"",
            "UJUMP endif0",
            "LABEL else0",
            "LABEL while1",
            "FJUMP b endwhile1",
            "WRITES \"b\"",
            "UJUMP while1",
            "LABEL endwhile1",
            "LABEL endif0",
            "RETURN"
        ]
    );
}

#[test]
fn test_gen_labels_unique_across_functions() {
    let mut b = TreeBuilder::new("test.asl");
    let yes = b.boolean(true);
    let first_if = b.if_stmt(yes, vec![], None);
    let first = b.function("first", vec![], None, vec![], vec![first_if]);
    let yes = b.boolean(true);
    let second_if = b.if_stmt(yes, vec![], None);
    let main = main_function(&mut b, vec![], vec![second_if]);
    let program = b.program(vec![first, main]);

    let code = generate_code(&program);
    assert_eq!(
        listing(&code, "first"),
        vec!["ILOAD %t0 1", "FJUMP %t0 endif0", "LABEL endif0", "RETURN"]
    );
    assert_eq!(
        listing(&code, "main"),
        vec!["ILOAD %t0 1", "FJUMP %t0 endif1", "LABEL endif1", "RETURN"]
    );
}

#[test]
fn test_gen_array_element_access() {
    let mut b = TreeBuilder::new("test.asl");
    let array = b.array("5", "int");
    let a = b.variable_decl(&["a"], array);
    let two = b.int(2);
    let target = b.left_indexed("a", two);
    let one = b.int(1);
    let element = b.index("a", one);
    let assign = b.assign(target, element);
    let program = main_only(&mut b, vec![a], vec![assign]);

    let code = generate_code(&program);
    assert_eq!(
        listing(&code, "main"),
        vec![
            "ALOAD %t0 a",
            "ILOAD %t1 2",
            "ILOAD %t2 4",
            "MUL %t3 %t1 %t2",
            "ADD %t4 %t0 %t3",
            "ALOAD %t5 a",
            "ILOAD %t6 1",
            "ILOAD %t7 4",
            "MUL %t8 %t6 %t7",
            "ADD %t9 %t5 %t8",
            "LOADX %t10 %t9",
            "XLOAD %t4 %t10",
            "RETURN"
        ]
    );
}

#[test]
fn test_gen_array_parameter_by_reference() {
    let mut b = TreeBuilder::new("test.asl");
    let array = b.array("3", "int");
    let v = b.parameter("v", array);
    let zero = b.int(0);
    let target = b.left_indexed("v", zero);
    let seven = b.int(7);
    let store = b.assign(target, seven);
    let fill = b.function("fill", vec![v], None, vec![], vec![store]);

    let array = b.array("3", "int");
    let a = b.variable_decl(&["a"], array);
    let var_a = b.var("a");
    let call = b.proc_call("fill", vec![var_a]);
    let main = main_function(&mut b, vec![a], vec![call]);
    let program = b.program(vec![fill, main]);

    let code = generate_code(&program);
    assert_eq!(
        listing(&code, "fill"),
        vec![
            "ILOAD %t0 0",
            "ILOAD %t1 4",
            "MUL %t2 %t0 %t1",
            "ADD %t3 v %t2",
            "ILOAD %t4 7",
            "XLOAD %t3 %t4",
            "RETURN"
        ]
    );
    assert_eq!(
        listing(&code, "main"),
        vec!["ALOAD %t0 a", "PUSH %t0", "CALL fill", "POP", "RETURN"]
    );

    let fill = code.subroutine("fill").unwrap();
    assert_eq!(fill.parameters[0].size, 4);
    assert_eq!(fill.frame_size, 4);
    let main = code.subroutine("main").unwrap();
    assert_eq!(main.locals[0].size, 12);
}

#[test]
fn test_gen_read_targets() {
    let mut b = TreeBuilder::new("test.asl");
    let array = b.array("2", "char");
    let a = b.variable_decl(&["a"], array);
    let float = b.basic("float");
    let f = b.variable_decl(&["f"], float);
    let one = b.int(1);
    let element = b.left_indexed("a", one);
    let read_element = b.read(element);
    let scalar = b.left("f");
    let read_scalar = b.read(scalar);
    let program = main_only(&mut b, vec![a, f], vec![read_element, read_scalar]);

    let code = generate_code(&program);
    assert_eq!(
        listing(&code, "main"),
        vec![
            "ALOAD %t0 a",
            "ILOAD %t1 1",
            "ILOAD %t2 1",
            "MUL %t3 %t1 %t2",
            "ADD %t4 %t0 %t3",
            "READC %t5",
            "XLOAD %t4 %t5",
            "READF f",
            "RETURN"
        ]
    );
}

#[test]
fn test_gen_whole_array_copy() {
    let mut b = TreeBuilder::new("test.asl");
    let array = b.array("2", "int");
    let arrays = b.variable_decl(&["a", "c"], array);
    let target = b.left("a");
    let source = b.var("c");
    let assign = b.assign(target, source);
    let program = main_only(&mut b, vec![arrays], vec![assign]);

    let code = generate_code(&program);
    let main = listing(&code, "main");
    assert_eq!(main[0], "ALOAD %t0 a");
    assert_eq!(main[1], "ALOAD %t1 c");
    assert!(main.contains(&String::from("LABEL copy0")));
    assert!(main.contains(&String::from("FJUMP %t6 endcopy0")));
    assert!(main.contains(&String::from("LOADX %t10 %t8")));
    assert!(main.contains(&String::from("XLOAD %t9 %t10")));
    assert_eq!(main[main.len() - 3], "UJUMP copy0");
    assert_eq!(main[main.len() - 2], "LABEL endcopy0");
}

#[test]
fn test_gen_frame_layout() {
    let mut b = TreeBuilder::new("test.asl");
    let int = b.basic("int");
    let i = b.variable_decl(&["i"], int);
    let char_type = b.basic("char");
    let c = b.variable_decl(&["c"], char_type);
    let program = main_only(&mut b, vec![i, c], vec![]);

    let code = generate_code(&program);
    let main = code.subroutine("main").unwrap();
    assert_eq!(main.locals.len(), 2);
    assert_eq!(main.locals[0].offset, 0);
    assert_eq!(main.locals[1].offset, 4);
    assert_eq!(main.locals[1].ty, Type::CHAR);
    assert_eq!(main.frame_size, 8);
    assert_eq!(main.returns, None);
}

#[test]
fn test_code_display() {
    let mut b = TreeBuilder::new("test.asl");
    let int = b.basic("int");
    let x = b.parameter("x", int);
    let var_x = b.var("x");
    let ret = b.return_stmt(Some(var_x));
    let id = b.function("id", vec![x], Some("int"), vec![], vec![ret]);
    let main = main_function(&mut b, vec![], vec![]);
    let program = b.program(vec![id, main]);

    let text = generate_code(&program).to_string();
    assert!(text.contains("subroutine id : int frame 4"));
    assert!(text.contains("param x : int @0 (4 bytes)"));
    assert!(text.contains("    RETURN x"));
    assert!(text.contains("subroutine main frame 0"));
    assert_eq!(text.matches("endsubroutine").count(), 2);
}

#[test]
fn test_generate_refuses_unresolved_errors() {
    let mut b = TreeBuilder::new("test.asl");
    let missing = b.var("missing");
    let write = b.write_expr(missing);
    let program = main_only(&mut b, vec![], vec![write]);

    let checked = type_check(&program, &Config::default()).unwrap();
    assert!(matches!(
        generate(&program, &checked),
        Err(CompileError::UnresolvedErrorsPresent { count: 1 })
    ));
}

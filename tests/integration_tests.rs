//! Integration tests for end-to-end compilation.
//!
//! These tests verify that the complete pipeline works correctly from a
//! built syntax tree through type checking and code generation.

use aslc::{
    ast::{
        ast::Program,
        builder::TreeBuilder,
        expressions::{ArithmeticOp, RelationalOp},
    },
    compile,
    errors::errors::CompileError,
    Config,
};

/// ```text
/// func fact(n : int) : int
///   var r : int
///   r = 1;
///   while n > 1 do r = r * n; n = n - 1; endwhile
///   return r;
/// endfunc
///
/// func main()
///   var x : int
///   read x;
///   write fact(x);
///   write "\n";
/// endfunc
/// ```
fn factorial_program() -> Program {
    let mut b = TreeBuilder::new("fact.asl");

    let int = b.basic("int");
    let n = b.parameter("n", int);
    let int = b.basic("int");
    let r = b.variable_decl(&["r"], int);

    let target = b.left("r");
    let one = b.int(1);
    let init = b.assign(target, one);

    let var_n = b.var("n");
    let one = b.int(1);
    let condition = b.relational(RelationalOp::Greater, var_n, one);
    let target = b.left("r");
    let (var_r, var_n) = (b.var("r"), b.var("n"));
    let product = b.arithmetic(ArithmeticOp::Mul, var_r, var_n);
    let multiply = b.assign(target, product);
    let target = b.left("n");
    let var_n = b.var("n");
    let one = b.int(1);
    let difference = b.arithmetic(ArithmeticOp::Sub, var_n, one);
    let decrement = b.assign(target, difference);
    let while_stmt = b.while_stmt(condition, vec![multiply, decrement]);

    let var_r = b.var("r");
    let ret = b.return_stmt(Some(var_r));
    let fact = b.function(
        "fact",
        vec![n],
        Some("int"),
        vec![r],
        vec![init, while_stmt, ret],
    );

    let int = b.basic("int");
    let x = b.variable_decl(&["x"], int);
    let target = b.left("x");
    let read = b.read(target);
    let var_x = b.var("x");
    let call = b.call("fact", vec![var_x]);
    let write = b.write_expr(call);
    let newline = b.write_string("\n");
    let main = b.function("main", vec![], None, vec![x], vec![read, write, newline]);

    b.program(vec![fact, main])
}

#[test]
fn test_compile_factorial() {
    let program = factorial_program();
    let compilation = compile(&program, &Config::default()).unwrap();

    assert!(compilation.warnings.is_empty());
    assert_eq!(compilation.code.subroutines.len(), 2);

    let fact = compilation.code.subroutine("fact").unwrap();
    assert_eq!(fact.parameters.len(), 1);
    assert_eq!(fact.locals.len(), 1);
    assert_eq!(fact.frame_size, 8);

    let listing: Vec<String> = fact
        .instructions
        .iter()
        .map(|instruction| instruction.to_string())
        .collect();
    assert_eq!(listing[0], "ILOAD %t0 1");
    assert_eq!(listing[1], "LOAD r %t0");
    assert_eq!(listing[2], "LABEL while0");
    assert!(listing.contains(&String::from("LT %t2 %t1 n")));
    assert!(listing.contains(&String::from("UJUMP while0")));
    assert!(listing.contains(&String::from("RETURN r")));

    let text = compilation.code.to_string();
    assert!(text.contains("CALL fact"));
    assert!(text.contains("READI x"));
    assert!(text.contains("POP %t0"));
    assert!(text.contains("WRITEI %t0"));
}

#[test]
fn test_compile_rejects_ill_typed_program() {
    let mut b = TreeBuilder::new("bad.asl");
    let int = b.basic("int");
    let x = b.variable_decl(&["x"], int);
    let target = b.left("x");
    let yes = b.boolean(true);
    let assign = b.assign(target, yes);
    let missing = b.var("missing");
    let write = b.write_expr(missing);
    let main = b.function("main", vec![], None, vec![x], vec![assign, write]);
    let program = b.program(vec![main]);

    match compile(&program, &Config::default()) {
        Err(CompileError::Rejected { diagnostics }) => {
            let names: Vec<&str> = diagnostics
                .iter()
                .map(|diagnostic| diagnostic.get_error_name())
                .collect();
            assert_eq!(names, vec!["TypeMismatch", "UndeclaredIdentifier"]);
        }
        other => panic!("Expected rejection, got {:?}", other),
    }
}

#[test]
fn test_compile_keeps_warnings() {
    let mut b = TreeBuilder::new("warn.asl");
    let helper = b.function("helper", vec![], None, vec![], vec![]);
    let int = b.basic("int");
    let shadow = b.variable_decl(&["helper"], int);
    let main = b.function("main", vec![], None, vec![shadow], vec![]);
    let program = b.program(vec![helper, main]);

    let compilation = compile(&program, &Config::default()).unwrap();
    assert_eq!(compilation.warnings.len(), 1);
    assert_eq!(
        compilation.warnings[0].get_error_name(),
        "ShadowedDeclaration"
    );

    let quiet = Config {
        warn_shadowing: false,
        ..Config::default()
    };
    let compilation = compile(&program, &quiet).unwrap();
    assert!(compilation.warnings.is_empty());
}

#[test]
fn test_compile_custom_entry_point() {
    let mut b = TreeBuilder::new("start.asl");
    let hello = b.write_string("hello");
    let start = b.function("start", vec![], None, vec![], vec![hello]);
    let program = b.program(vec![start]);

    assert!(matches!(
        compile(&program, &Config::default()),
        Err(CompileError::Rejected { .. })
    ));

    let config = Config {
        entry_point: String::from("start"),
        ..Config::default()
    };
    let compilation = compile(&program, &config).unwrap();
    assert!(compilation.code.subroutine("start").is_some());
}

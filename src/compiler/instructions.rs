//! Abstract instructions produced by the generator.
//!
//! The instruction set is a small three-address code over named variables
//! and numbered temporaries. The `Display` form of [`Code`] is what the
//! external emitter consumes.

use std::fmt::Display;

use crate::type_checker::types::{BasicType, Type};

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A parameter or local variable of the current subroutine.
    Var(String),
    /// A temporary, numbered within its subroutine.
    Temp(u32),
}

impl Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::Var(name) => write!(f, "{}", name),
            Operand::Temp(number) => write!(f, "%t{}", number),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    FAdd,
    FSub,
    FMul,
    FDiv,
    Eq,
    Lt,
    Le,
    FEq,
    FLt,
    FLe,
    And,
    Or,
}

impl BinOp {
    pub fn opcode(&self) -> &'static str {
        match self {
            BinOp::Add => "ADD",
            BinOp::Sub => "SUB",
            BinOp::Mul => "MUL",
            BinOp::Div => "DIV",
            BinOp::Mod => "MOD",
            BinOp::FAdd => "FADD",
            BinOp::FSub => "FSUB",
            BinOp::FMul => "FMUL",
            BinOp::FDiv => "FDIV",
            BinOp::Eq => "EQ",
            BinOp::Lt => "LT",
            BinOp::Le => "LE",
            BinOp::FEq => "FEQ",
            BinOp::FLt => "FLT",
            BinOp::FLe => "FLE",
            BinOp::And => "AND",
            BinOp::Or => "OR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Not,
    Neg,
    FNeg,
}

impl UnOp {
    pub fn opcode(&self) -> &'static str {
        match self {
            UnOp::Not => "NOT",
            UnOp::Neg => "NEG",
            UnOp::FNeg => "FNEG",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    ILoad { dst: Operand, value: i64 },
    FLoad { dst: Operand, value: f64 },
    ChLoad { dst: Operand, value: char },
    Load { dst: Operand, src: Operand },
    /// Converts an int to a float.
    Float { dst: Operand, src: Operand },
    Binary { op: BinOp, dst: Operand, left: Operand, right: Operand },
    Unary { op: UnOp, dst: Operand, src: Operand },
    AddressOf { dst: Operand, var: String },
    LoadIndirect { dst: Operand, address: Operand },
    StoreIndirect { address: Operand, src: Operand },
    Label(String),
    Jump(String),
    JumpIfFalse { condition: Operand, label: String },
    /// Pushes a call argument; `None` reserves the slot for a result.
    Push(Option<Operand>),
    /// Pops the stack, keeping the value when an operand is given.
    Pop(Option<Operand>),
    Call(String),
    Return(Option<Operand>),
    Read { ty: BasicType, dst: Operand },
    Write { ty: BasicType, src: Operand },
    WriteString(String),
}

fn io_suffix(ty: &BasicType) -> &'static str {
    match ty {
        BasicType::Int | BasicType::Bool => "I",
        BasicType::Float => "F",
        BasicType::Char => "C",
    }
}

impl Instruction {
    pub fn opcode(&self) -> String {
        let opcode = match self {
            Instruction::ILoad { .. } => "ILOAD",
            Instruction::FLoad { .. } => "FLOAD",
            Instruction::ChLoad { .. } => "CHLOAD",
            Instruction::Load { .. } => "LOAD",
            Instruction::Float { .. } => "FLOAT",
            Instruction::Binary { op, .. } => op.opcode(),
            Instruction::Unary { op, .. } => op.opcode(),
            Instruction::AddressOf { .. } => "ALOAD",
            Instruction::LoadIndirect { .. } => "LOADX",
            Instruction::StoreIndirect { .. } => "XLOAD",
            Instruction::Label(_) => "LABEL",
            Instruction::Jump(_) => "UJUMP",
            Instruction::JumpIfFalse { .. } => "FJUMP",
            Instruction::Push(_) => "PUSH",
            Instruction::Pop(_) => "POP",
            Instruction::Call(_) => "CALL",
            Instruction::Return(_) => "RETURN",
            Instruction::Read { ty, .. } => return format!("READ{}", io_suffix(ty)),
            Instruction::Write { ty, .. } => return format!("WRITE{}", io_suffix(ty)),
            Instruction::WriteString(_) => "WRITES",
        };
        String::from(opcode)
    }

    pub fn is_label(&self) -> bool {
        matches!(self, Instruction::Label(_))
    }

    fn operands(&self) -> Vec<String> {
        match self {
            Instruction::ILoad { dst, value } => vec![dst.to_string(), value.to_string()],
            Instruction::FLoad { dst, value } => vec![dst.to_string(), format!("{:?}", value)],
            Instruction::ChLoad { dst, value } => vec![dst.to_string(), format!("{:?}", value)],
            Instruction::Load { dst, src }
            | Instruction::Float { dst, src }
            | Instruction::Unary { dst, src, .. } => vec![dst.to_string(), src.to_string()],
            Instruction::Binary {
                dst, left, right, ..
            } => vec![dst.to_string(), left.to_string(), right.to_string()],
            Instruction::AddressOf { dst, var } => vec![dst.to_string(), var.clone()],
            Instruction::LoadIndirect { dst, address } => {
                vec![dst.to_string(), address.to_string()]
            }
            Instruction::StoreIndirect { address, src } => {
                vec![address.to_string(), src.to_string()]
            }
            Instruction::Label(label) | Instruction::Jump(label) | Instruction::Call(label) => {
                vec![label.clone()]
            }
            Instruction::JumpIfFalse { condition, label } => {
                vec![condition.to_string(), label.clone()]
            }
            Instruction::Push(operand) | Instruction::Pop(operand) | Instruction::Return(operand) => {
                operand.iter().map(|operand| operand.to_string()).collect()
            }
            Instruction::Read { dst, .. } => vec![dst.to_string()],
            Instruction::Write { src, .. } => vec![src.to_string()],
            Instruction::WriteString(text) => vec![format!("{:?}", text)],
        }
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.opcode())?;
        for operand in self.operands() {
            write!(f, " {}", operand)?;
        }
        Ok(())
    }
}

/// An ordered, append-only run of instructions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstructionList {
    instructions: Vec<Instruction>,
}

impl InstructionList {
    pub fn new() -> Self {
        InstructionList::default()
    }

    pub fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    /// Appends every instruction of `other`, keeping their order.
    pub fn append(&mut self, other: InstructionList) {
        self.instructions.extend(other.instructions);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn last(&self) -> Option<&Instruction> {
        self.instructions.last()
    }
}

impl From<Vec<Instruction>> for InstructionList {
    fn from(instructions: Vec<Instruction>) -> Self {
        InstructionList { instructions }
    }
}

impl Display for InstructionList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for instruction in self.instructions.iter() {
            if instruction.is_label() {
                writeln!(f, "  {}", instruction)?;
            } else {
                writeln!(f, "    {}", instruction)?;
            }
        }
        Ok(())
    }
}

/// Storage for one parameter or local variable in a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub name: String,
    pub ty: Type,
    pub offset: u32,
    pub size: u32,
}

impl Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} : {} @{} ({} bytes)", self.name, self.ty, self.offset, self.size)
    }
}

/// The generated code of one function.
#[derive(Debug, Clone, PartialEq)]
pub struct Subroutine {
    pub name: String,
    pub parameters: Vec<Slot>,
    pub locals: Vec<Slot>,
    pub returns: Option<BasicType>,
    pub frame_size: u32,
    pub instructions: InstructionList,
}

impl Display for Subroutine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "subroutine {}", self.name)?;
        if let Some(returns) = &self.returns {
            write!(f, " : {}", returns)?;
        }
        writeln!(f, " frame {}", self.frame_size)?;

        for parameter in self.parameters.iter() {
            writeln!(f, "  param {}", parameter)?;
        }
        for local in self.locals.iter() {
            writeln!(f, "  var {}", local)?;
        }
        write!(f, "{}", self.instructions)?;
        writeln!(f, "endsubroutine")
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Code {
    pub subroutines: Vec<Subroutine>,
}

impl Code {
    pub fn subroutine(&self, name: &str) -> Option<&Subroutine> {
        self.subroutines
            .iter()
            .find(|subroutine| subroutine.name == name)
    }
}

impl Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for subroutine in self.subroutines.iter() {
            write!(f, "{}", subroutine)?;
        }
        Ok(())
    }
}

// Opcode table: numeric value, operand arity and mnemonic of every instruction

use std::fmt;

#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Halt = 0,
    Set = 1,
    Push = 2,
    Pop = 3,
    Eq = 4,
    Gt = 5,
    Jmp = 6,
    Jt = 7,
    Jf = 8,
    Add = 9,
    Mult = 10,
    Mod = 11,
    And = 12,
    Or = 13,
    Not = 14,
    Rmem = 15,
    Wmem = 16,
    Call = 17,
    Ret = 18,
    Out = 19,
    In = 20,
    Nop = 21,
}

impl Opcode {
    pub const COUNT: usize = 22;

    pub const ALL: [Opcode; Opcode::COUNT] = [
        Opcode::Halt,
        Opcode::Set,
        Opcode::Push,
        Opcode::Pop,
        Opcode::Eq,
        Opcode::Gt,
        Opcode::Jmp,
        Opcode::Jt,
        Opcode::Jf,
        Opcode::Add,
        Opcode::Mult,
        Opcode::Mod,
        Opcode::And,
        Opcode::Or,
        Opcode::Not,
        Opcode::Rmem,
        Opcode::Wmem,
        Opcode::Call,
        Opcode::Ret,
        Opcode::Out,
        Opcode::In,
        Opcode::Nop,
    ];

    /// Number of operand words following the opcode
    pub fn arity(self) -> u16 {
        use Opcode::*;
        match self {
            Halt | Ret | Nop => 0,
            Push | Pop | Jmp | Call | Out | In => 1,
            Set | Jt | Jf | Not | Rmem | Wmem => 2,
            Eq | Gt | Add | Mult | Mod | And | Or => 3,
        }
    }

    /// Total words occupied by the instruction, opcode included
    pub fn size(self) -> u16 {
        1 + self.arity()
    }

    pub fn mnemonic(self) -> &'static str {
        use Opcode::*;
        match self {
            Halt => "halt",
            Set => "set",
            Push => "push",
            Pop => "pop",
            Eq => "eq",
            Gt => "gt",
            Jmp => "jmp",
            Jt => "jt",
            Jf => "jf",
            Add => "add",
            Mult => "mult",
            Mod => "mod",
            And => "and",
            Or => "or",
            Not => "not",
            Rmem => "rmem",
            Wmem => "wmem",
            Call => "call",
            Ret => "ret",
            Out => "out",
            In => "in",
            Nop => "nop",
        }
    }
}

impl TryFrom<u16> for Opcode {
    type Error = u16;

    fn try_from(word: u16) -> Result<Self, Self::Error> {
        Opcode::ALL.get(word as usize).copied().ok_or(word)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

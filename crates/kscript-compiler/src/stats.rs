//! Size metrics of a parsed program, used to grade puzzle constraints.

use kscript_types::ast::{Block, Program, Stmt};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProgramStats {
    /// Every statement, counting into function bodies and nested blocks.
    pub statements: usize,
    pub top_level_statements: usize,
    /// Function declarations anywhere in the program.
    pub functions: usize,
    /// Most parameters on any one function.
    pub max_params: usize,
    /// Most statements in any one function body, nested blocks included.
    pub longest_function: usize,
}

impl ProgramStats {
    pub fn collect(program: &Program) -> Self {
        let mut stats = ProgramStats {
            top_level_statements: program.stmts.len(),
            ..Self::default()
        };
        stats.statements = stats.walk(&program.stmts);
        stats
    }

    /// Count `stmts` recursively, recording function metrics on the way.
    fn walk(&mut self, stmts: &[Stmt]) -> usize {
        let mut count = 0;
        for stmt in stmts {
            count += 1;
            match stmt {
                Stmt::Func(decl) => {
                    self.functions += 1;
                    self.max_params = self.max_params.max(decl.params.len());
                    let body = self.walk_block(&decl.body);
                    self.longest_function = self.longest_function.max(body);
                    count += body;
                }
                Stmt::If(if_stmt) => {
                    for branch in &if_stmt.branches {
                        count += self.walk_block(&branch.body);
                    }
                    if let Some(block) = &if_stmt.else_block {
                        count += self.walk_block(block);
                    }
                }
                Stmt::While(while_stmt) => count += self.walk_block(&while_stmt.body),
                Stmt::Var(_) | Stmt::Assign(_) | Stmt::Return(_) | Stmt::Expr(_) => {}
            }
        }
        count
    }

    fn walk_block(&mut self, block: &Block) -> usize {
        self.walk(&block.stmts)
    }
}

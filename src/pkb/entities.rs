use super::{sorted, Pkb};
use crate::ast::NodeKind;

impl Pkb {
    pub fn statements(&self) -> Vec<usize> {
        (1..=self.kinds.len()).collect()
    }

    pub fn variables(&self) -> Vec<String> {
        self.variables.iter().cloned().collect()
    }

    pub fn procedures(&self) -> Vec<String> {
        self.procedures.iter().cloned().collect()
    }

    pub fn constants(&self) -> Vec<String> {
        self.constants.iter().cloned().collect()
    }

    pub fn statements_of_kind(&self, kind: NodeKind) -> Vec<usize> {
        sorted(self.statements_by_kind.get(&kind))
    }

    pub fn reads(&self) -> Vec<usize> {
        self.statements_of_kind(NodeKind::Read)
    }

    pub fn prints(&self) -> Vec<usize> {
        self.statements_of_kind(NodeKind::Print)
    }

    pub fn calls(&self) -> Vec<usize> {
        self.statements_of_kind(NodeKind::Call)
    }

    pub fn whiles(&self) -> Vec<usize> {
        self.statements_of_kind(NodeKind::While)
    }

    pub fn ifs(&self) -> Vec<usize> {
        self.statements_of_kind(NodeKind::IfElse)
    }

    pub fn assigns(&self) -> Vec<usize> {
        self.statements_of_kind(NodeKind::Assign)
    }

    pub fn is_read(&self, stmt: usize) -> bool {
        self.kind_of(stmt) == Some(NodeKind::Read)
    }

    pub fn is_print(&self, stmt: usize) -> bool {
        self.kind_of(stmt) == Some(NodeKind::Print)
    }

    pub fn is_call(&self, stmt: usize) -> bool {
        self.kind_of(stmt) == Some(NodeKind::Call)
    }

    pub fn is_while(&self, stmt: usize) -> bool {
        self.kind_of(stmt) == Some(NodeKind::While)
    }

    pub fn is_if(&self, stmt: usize) -> bool {
        self.kind_of(stmt) == Some(NodeKind::IfElse)
    }

    pub fn is_assign(&self, stmt: usize) -> bool {
        self.kind_of(stmt) == Some(NodeKind::Assign)
    }

    pub fn is_statement(&self, stmt: usize) -> bool {
        self.kind_of(stmt).is_some()
    }

    pub fn is_variable(&self, name: &str) -> bool {
        self.variables.contains(name)
    }

    pub fn is_procedure(&self, name: &str) -> bool {
        self.procedures.contains(name)
    }

    pub fn is_constant(&self, value: &str) -> bool {
        self.constants.contains(value)
    }

    /// Call statements invoking `procedure`.
    pub fn call_statements_of(&self, procedure: &str) -> Vec<usize> {
        sorted(self.calls_of.get(procedure))
    }

    pub fn procedure_called_at(&self, stmt: usize) -> Option<&str> {
        self.call_target.get(&stmt).map(String::as_str)
    }

    pub fn read_statements_of(&self, variable: &str) -> Vec<usize> {
        sorted(self.reads_of.get(variable))
    }

    pub fn variable_read_at(&self, stmt: usize) -> Option<&str> {
        self.read_target.get(&stmt).map(String::as_str)
    }

    pub fn print_statements_of(&self, variable: &str) -> Vec<usize> {
        sorted(self.prints_of.get(variable))
    }

    pub fn variable_printed_at(&self, stmt: usize) -> Option<&str> {
        self.print_target.get(&stmt).map(String::as_str)
    }
}

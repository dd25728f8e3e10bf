/*
*                 simple-spa -- SIMPLE static program analyzer.
*
* program        = procedure { procedure } ;
* procedure      = "procedure" name stmtLst ;
* stmtLst        = "{" stmt { stmt } "}" ;
* stmt           = read | print | call | while | if | assign ;
* read           = "read" name ";" ;
* print          = "print" name ";" ;
* call           = "call" name ";" ;
* while          = "while" "(" cond_expr ")" stmtLst ;
* if             = "if" "(" cond_expr ")" "then" stmtLst "else" stmtLst ;
* assign         = name "=" expr ";" ;
* cond_expr      = rel_expr | "!" "(" cond_expr ")"
*                | "(" cond_expr ")" ( "&&" | "||" ) "(" cond_expr ")" ;
* rel_expr       = rel_factor ( ">" | ">=" | "<" | "<=" | "==" | "!=" ) rel_factor ;
* rel_factor     = name | integer | expr ;
* expr           = term { ( "+" | "-" ) term } ;
* term           = factor { ( "*" | "/" | "%" ) factor } ;
* factor         = name | integer | "(" expr ")" ;
*/

mod kind;
mod node;

pub use kind::NodeKind;
pub use node::{NodePath, TNode};

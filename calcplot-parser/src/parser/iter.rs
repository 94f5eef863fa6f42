use super::ast::expr::Expr;

/// An iterator that iteratively traverses the tree of expressions in left-to-right post-order
/// (i.e. depth-first). Every node is visited exactly once, children before parents.
///
/// This iterator is created by [`Expr::post_order_iter`].
pub struct ExprIter<'a> {
    stack: Vec<&'a Expr>,
    last_visited: Option<&'a Expr>,
}

impl<'a> ExprIter<'a> {
    /// Creates a new iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn new(expr: &'a Expr) -> Self {
        Self {
            stack: vec![expr],
            last_visited: None,
        }
    }

    /// Pops the current expression in the stack and marks it as the last visited expression.
    fn visit(&mut self) -> Option<&'a Expr> {
        self.last_visited = Some(self.stack.pop()?);
        self.last_visited
    }

    /// Returns true if the given expression matches the last visited expression.
    fn is_last_visited(&self, expr: &'a Expr) -> bool {
        match self.last_visited {
            Some(last_visited) => std::ptr::eq(last_visited, expr),
            None => false,
        }
    }
}

impl<'a> Iterator for ExprIter<'a> {
    type Item = &'a Expr;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let expr = *self.stack.last()?;
            match expr {
                Expr::Literal(_) => return self.visit(),
                Expr::Paren(paren) => {
                    if self.is_last_visited(&paren.expr) {
                        return self.visit();
                    }
                    self.stack.push(&paren.expr);
                },
                Expr::Call(call) => {
                    let last_child = call.args.last().unwrap_or(&call.callee);
                    if self.is_last_visited(last_child) {
                        return self.visit();
                    }
                    for arg in call.args.iter().rev() {
                        self.stack.push(arg);
                    }
                    self.stack.push(&call.callee);
                },
                Expr::Member(member) => {
                    if self.is_last_visited(&member.target) {
                        return self.visit();
                    }
                    self.stack.push(&member.target);
                },
                Expr::Index(index) => {
                    if self.is_last_visited(&index.index) {
                        return self.visit();
                    }
                    self.stack.push(&index.index);
                    self.stack.push(&index.target);
                },
                Expr::Unary(unary) => {
                    if self.is_last_visited(&unary.operand) {
                        return self.visit();
                    }
                    self.stack.push(&unary.operand);
                },
                Expr::Binary(binary) => {
                    if self.is_last_visited(&binary.rhs) {
                        return self.visit();
                    }
                    self.stack.push(&binary.rhs);
                    self.stack.push(&binary.lhs);
                },
                Expr::Assign(assign) => {
                    if self.is_last_visited(&assign.value) {
                        return self.visit();
                    }
                    self.stack.push(&assign.value);
                    self.stack.push(&assign.target);
                },
            }
        }
    }
}

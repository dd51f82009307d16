use crate::*;

impl Node {
    /// Direct children in source order.
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::Command(c) => c.args.iter().collect(),
            Node::Query(_) => Vec::new(),
            Node::Function(f) => f.args.iter().collect(),
            Node::Option(o) => o.args.iter().collect(),
            Node::List(l) => l.items.iter().collect(),
            Node::InlineCast(c) => vec![c.value.as_ref()],
            Node::Order(o) => vec![o.expr.as_ref()],
            Node::Column(_)
            | Node::Identifier(_)
            | Node::Source(_)
            | Node::Literal(_)
            | Node::TimeInterval(_) => Vec::new(),
        }
    }

    /// Pre-order traversal. FORK branches are not entered: each branch is a
    /// pipeline of its own and is walked by whoever owns it.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// Every function node below (and including) this node.
    pub fn functions(&self) -> Vec<&Function> {
        let mut out = Vec::new();
        self.walk(&mut |n| {
            if let Node::Function(f) = n {
                out.push(f);
            }
        });
        out
    }

    /// Every column reference below (and including) this node.
    pub fn columns(&self) -> Vec<&Column> {
        let mut out = Vec::new();
        self.walk(&mut |n| {
            if let Node::Column(c) = n {
                out.push(c);
            }
        });
        out
    }

    /// Deepest node whose location contains `offset` or ends right at it.
    pub fn innermost_at(&self, offset: usize) -> Option<&Node> {
        if !self.location().touches(offset) {
            return None;
        }
        self.children()
            .into_iter()
            .rev()
            .find_map(|child| child.innermost_at(offset))
            .or(Some(self))
    }
}

impl Query {
    /// The command whose span contains or immediately precedes `offset`,
    /// descending into FORK branches.
    pub fn command_at(&self, offset: usize) -> Option<&Command> {
        let command = self
            .commands
            .iter()
            .rev()
            .find(|c| c.location.start <= offset)?;
        for arg in command.args.iter().rev() {
            if let Node::Query(branch) = arg
                && branch.location.touches(offset)
                && (branch.incomplete || branch.location.end > offset)
            {
                return branch.command_at(offset).or(Some(command));
            }
        }
        Some(command)
    }

    /// Walk every command, FORK branches included, in source order.
    pub fn visit_commands<'a>(&'a self, visit: &mut impl FnMut(&'a Command)) {
        for command in &self.commands {
            visit(command);
            for arg in &command.args {
                if let Node::Query(branch) = arg {
                    branch.visit_commands(visit);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn innermost_node_at_cursor() {
        let ParseResult { query, .. } = parse("FROM a | EVAL x = round(abs(b), 2)");
        let eval = Node::Command(query.commands[1].clone());
        let inner = eval.innermost_at(29).expect("node at cursor");
        assert_eq!(inner.as_column().map(|c| c.name.as_str()), Some("b"));
        let outer = eval.innermost_at(33).expect("node at cursor");
        assert_eq!(outer.as_literal().map(|l| l.value.as_str()), Some("2"));
    }

    #[test]
    fn collects_functions_and_columns() {
        let ParseResult { query, .. } = parse("FROM a | WHERE x > 1 AND y == \"z\"");
        let node = Node::Command(query.commands[1].clone());
        let names: Vec<_> = node.functions().iter().map(|f| f.name.clone()).collect();
        assert_eq!(names, vec!["and", ">", "=="]);
        let cols: Vec<_> = node.columns().iter().map(|c| c.name.clone()).collect();
        assert_eq!(cols, vec!["x", "y"]);
    }

    #[test]
    fn command_at_descends_into_open_fork_branch() {
        let ParseResult { query, .. } = parse("FROM a | FORK (WHERE x > 1) (LIMIT 1");
        let command = query.command_at(36).expect("command");
        assert_eq!(command.name, "limit");
        let ParseResult { query, .. } = parse("FROM a | FORK (WHERE x > 1) (LIMIT 1)");
        assert_eq!(query.command_at(37).expect("command").name, "fork");
    }

    #[test]
    fn visit_commands_includes_branches() {
        let ParseResult { query, .. } = parse("FROM a | FORK (WHERE x > 1) (LIMIT 1) | KEEP x");
        let mut names = Vec::new();
        query.visit_commands(&mut |c| names.push(c.name.clone()));
        assert_eq!(names, vec!["from", "fork", "where", "limit", "keep"]);
    }
}

//! Columns flowing through a pipeline.
use crate::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    /// `None` when the type could not be inferred.
    pub ty: Option<FieldType>,
    /// Introduced by the query itself (EVAL, STATS, RENAME, ...).
    pub user_defined: bool,
}

impl Field {
    /// A column of the input schema.
    pub fn new(name: impl Into<String>, ty: Option<FieldType>) -> Self {
        Self {
            name: name.into(),
            ty,
            user_defined: false,
        }
    }
}

/// Ordered set of columns available at some point of a pipeline.
///
/// A set built without collaborator data is not `known`: lookups of names
/// it does not hold are inconclusive, so unknown column checks are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSet {
    fields: Vec<Field>,
    known: bool,
}

impl ColumnSet {
    pub fn known() -> Self {
        Self {
            fields: Vec::new(),
            known: true,
        }
    }

    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn from_schema(columns: Option<&[ColumnInfo]>) -> Self {
        match columns {
            None => Self::unknown(),
            Some(columns) => Self {
                fields: columns
                    .iter()
                    .map(|c| Field {
                        name: c.name.clone(),
                        ty: Some(c.field_type()),
                        user_defined: false,
                    })
                    .collect(),
                known: true,
            },
        }
    }

    pub fn is_known(&self) -> bool {
        self.known
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// `Some(true/false)` when the answer is certain.
    pub fn has(&self, name: &str) -> Option<bool> {
        match self.get(name) {
            Some(_) => Some(true),
            None if self.known => Some(false),
            None => None,
        }
    }

    /// Add or redefine a column; a redefined column moves to the end.
    pub fn insert(&mut self, name: impl Into<String>, ty: Option<FieldType>, user_defined: bool) {
        let name = name.into();
        self.fields.retain(|f| f.name != name);
        self.fields.push(Field {
            name,
            ty,
            user_defined,
        });
    }

    pub fn extend(&mut self, other: ColumnSet) {
        for field in other.fields {
            self.insert(field.name, field.ty, field.user_defined);
        }
        self.known &= other.known;
    }

    pub fn matching<'s>(&'s self, pattern: &'s str) -> impl Iterator<Item = &'s Field> + 's {
        self.fields.iter().filter(move |f| glob_match(pattern, &f.name))
    }

    /// KEEP semantics: columns ordered by the first pattern matching them.
    pub fn keep(&mut self, patterns: &[&str]) {
        if !self.known {
            return;
        }
        let mut kept = Vec::new();
        for pattern in patterns {
            for field in self.fields.iter().filter(|f| glob_match(pattern, &f.name)) {
                if !kept.iter().any(|k: &Field| k.name == field.name) {
                    kept.push(field.clone());
                }
            }
        }
        self.fields = kept;
    }

    pub fn drop(&mut self, patterns: &[&str]) {
        self.fields
            .retain(|f| !patterns.iter().any(|p| glob_match(p, &f.name)));
    }

    /// Rename in place. Renaming a column the set does not hold keeps the new
    /// name with an unknown type.
    pub fn rename(&mut self, old: &str, new: &str) {
        let ty = self.get(old).and_then(|f| f.ty);
        self.fields.retain(|f| f.name != new);
        match self.fields.iter_mut().find(|f| f.name == old) {
            Some(field) => {
                field.name = new.to_string();
                field.user_defined = true;
            }
            None => self.insert(new, ty, true),
        }
    }
}

impl FromIterator<Field> for ColumnSet {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        let mut set = ColumnSet::known();
        for field in iter {
            set.insert(field.name, field.ty, field.user_defined);
        }
        set
    }
}

/// `*` matches any run of characters; everything else is literal.
pub fn glob_match(pattern: &str, name: &str) -> bool {
    let Some((head, rest)) = pattern.split_once('*') else {
        return pattern == name;
    };
    let Some(mut remaining) = name.strip_prefix(head) else {
        return false;
    };
    let mut pieces = rest.split('*').peekable();
    while let Some(piece) = pieces.next() {
        if pieces.peek().is_none() {
            return remaining.len() >= piece.len() && remaining.ends_with(piece);
        }
        match remaining.find(piece) {
            Some(at) => remaining = &remaining[at + piece.len()..],
            None => return false,
        }
    }
    true
}

/// Columns left after running `commands` on `input`. What follows a command
/// that did not parse is unknown.
pub fn columns_through(commands: &[Command], input: ColumnSet, schema: &SchemaSnapshot) -> ColumnSet {
    commands
        .iter()
        .fold(input, |columns, command| columns_after(command, columns, schema))
}

pub(crate) fn columns_after(command: &Command, columns: ColumnSet, schema: &SchemaSnapshot) -> ColumnSet {
    match command_definition(&command.name) {
        Some(definition) if !command.incomplete => (definition.columns_after)(command, columns, schema),
        _ => ColumnSet::unknown(),
    }
}

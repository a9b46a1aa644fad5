use super::snake_case;

/// The table an entity type is stored in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Table {
    /// Schema qualifier, if the entity declared one
    pub schema: Option<String>,

    /// Unqualified table name
    pub name: String,
}

impl Table {
    /// Derives the table from an entity type name. Module paths and generic
    /// arguments are stripped before the case conversion, so
    /// `library::model::BookAuthor` becomes `book_author`.
    pub fn for_type(type_name: &str, schema: Option<&str>) -> Table {
        let base = type_name.split('<').next().unwrap_or(type_name);
        let base = base.rsplit("::").next().unwrap_or(base);

        Table {
            schema: schema.map(str::to_string),
            name: snake_case(base),
        }
    }

    /// The name as it appears in SQL: `schema.table` or `table`.
    pub fn qualified_name(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{schema}.{}", self.name),
            None => self.name.clone(),
        }
    }
}

impl core::fmt::Display for Table {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if let Some(schema) = &self.schema {
            write!(f, "{schema}.")?;
        }
        f.write_str(&self.name)
    }
}

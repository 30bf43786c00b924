use crate::number::Number;
use crate::position::Position;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub const PROGRAM_NAME: &str = "<program>";

/// Variable scope. Lookups fall through to the parent table; writes always
/// land in this one.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: HashMap<String, Number>,
    parent: Option<Rc<RefCell<SymbolTable>>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A root table seeded with `NULL`, `FALSE` and `TRUE`.
    pub fn with_globals() -> Self {
        let mut table = Self::new();
        table.set("NULL", Number::int(0));
        table.set("FALSE", Number::int(0));
        table.set("TRUE", Number::int(1));
        table
    }

    pub fn chained(parent: Rc<RefCell<SymbolTable>>) -> Self {
        Self {
            symbols: HashMap::new(),
            parent: Some(parent),
        }
    }

    pub fn get(&self, name: &str) -> Option<Number> {
        match self.symbols.get(name) {
            Some(value) => Some(value.clone()),
            None => self.parent.as_ref().and_then(|parent| parent.borrow().get(name)),
        }
    }

    pub fn set(&mut self, name: &str, value: Number) {
        self.symbols.insert(name.to_string(), value);
    }

    pub fn remove(&mut self, name: &str) -> Option<Number> {
        self.symbols.remove(name)
    }
}

/// An evaluation frame. Frames record where they were entered so a
/// traceback can be rebuilt by walking `parent` links.
#[derive(Debug)]
pub struct Context {
    pub display_name: String,
    pub parent: Option<Rc<Context>>,
    pub parent_entry: Option<Position>,
    pub symbol_table: Rc<RefCell<SymbolTable>>,
}

impl Context {
    pub fn new(display_name: &str, symbol_table: SymbolTable) -> Rc<Self> {
        Rc::new(Self {
            display_name: display_name.to_string(),
            parent: None,
            parent_entry: None,
            symbol_table: Rc::new(RefCell::new(symbol_table)),
        })
    }

    pub fn root(symbol_table: SymbolTable) -> Rc<Self> {
        Self::new(PROGRAM_NAME, symbol_table)
    }

    /// A nested frame entered at `entry`, whose scope chains to the parent's.
    pub fn child(parent: &Rc<Context>, display_name: &str, entry: Position) -> Rc<Self> {
        Rc::new(Self {
            display_name: display_name.to_string(),
            parent: Some(Rc::clone(parent)),
            parent_entry: Some(entry),
            symbol_table: Rc::new(RefCell::new(SymbolTable::chained(Rc::clone(&parent.symbol_table)))),
        })
    }

    pub fn lookup(&self, name: &str) -> Option<Number> {
        self.symbol_table.borrow().get(name)
    }

    pub fn assign(&self, name: &str, value: Number) {
        self.symbol_table.borrow_mut().set(name, value);
    }
}

//! Generator for small random Python programs

use super::ProgramGenerator;
use crate::error::{SearchError, SearchResult};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

const IDENT_HEAD: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const IDENT_TAIL: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789_";
const OPERATORS: [&str; 5] = ["+", "-", "*", "//", "%"];
const INDENT: &str = "    ";

/// Shape of generated programs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Functions in a full program
    pub functions_per_program: usize,
    /// Classes in a full program
    pub containers_per_program: usize,
    /// Maximum parameters of a generated function
    pub max_parameters: usize,
    /// Statement count range of a function body
    pub function_statements: (usize, usize),
    /// Method count range of a class
    pub methods_per_container: (usize, usize),
    /// Statement count range of a method body
    pub method_statements: (usize, usize),
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            functions_per_program: 3,
            containers_per_program: 2,
            max_parameters: 3,
            function_statements: (1, 5),
            methods_per_container: (1, 3),
            method_statements: (1, 3),
        }
    }
}

impl GeneratorConfig {
    /// Validate ranges
    pub fn validate(&self) -> SearchResult<()> {
        for (name, (low, high)) in [
            ("function_statements", self.function_statements),
            ("methods_per_container", self.methods_per_container),
            ("method_statements", self.method_statements),
        ] {
            if low == 0 || low > high {
                return Err(SearchError::invalid_config(format!(
                    "{} must be a non-empty range starting above 0",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// Builds programs out of random functions and classes whose bodies are
/// prints, assignments, integer arithmetic and trivial `if`/`for` blocks
#[derive(Debug, Clone, Default)]
pub struct PythonProgramGenerator {
    config: GeneratorConfig,
}

impl PythonProgramGenerator {
    /// Create a generator with the given shape
    pub fn new(config: GeneratorConfig) -> SearchResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    fn identifier(&self, rng: &mut dyn RngCore, length: usize) -> String {
        let mut ident = String::with_capacity(length);
        ident.push(IDENT_HEAD[rng.gen_range(0..IDENT_HEAD.len())] as char);
        for _ in 1..length {
            ident.push(IDENT_TAIL[rng.gen_range(0..IDENT_TAIL.len())] as char);
        }
        ident
    }

    fn value(&self, rng: &mut dyn RngCore) -> String {
        match rng.gen_range(0..4) {
            0 => rng.gen_range(0..=1000).to_string(),
            1 => format!("\"{}\"", self.identifier(rng, 5)),
            2 => (if rng.gen_bool(0.5) { "True" } else { "False" }).to_string(),
            _ => {
                let len = rng.gen_range(1..=5);
                let items: Vec<String> = (0..len)
                    .map(|_| rng.gen_range(0..=100).to_string())
                    .collect();
                format!("[{}]", items.join(", "))
            }
        }
    }

    /// One statement at `depth` levels of indentation, newline terminated
    fn statement(&self, rng: &mut dyn RngCore, depth: usize) -> String {
        let pad = INDENT.repeat(depth);
        let inner = INDENT.repeat(depth + 1);
        match rng.gen_range(0..5) {
            0 => format!("{}print({})\n", pad, self.value(rng)),
            1 => format!("{}{} = {}\n", pad, self.identifier(rng, 8), self.value(rng)),
            2 => {
                let lhs = rng.gen_range(1..=100);
                let op = OPERATORS.choose(&mut *rng).copied().unwrap_or("+");
                let rhs = rng.gen_range(1..=100);
                format!("{}result = {} {} {}\n", pad, lhs, op, rhs)
            }
            3 => {
                let cond = if rng.gen_bool(0.5) { "True" } else { "False" };
                format!("{}if {}:\n{}pass\n", pad, cond, inner)
            }
            _ => format!(
                "{}for i in range({}):\n{}pass\n",
                pad,
                rng.gen_range(1..=10),
                inner
            ),
        }
    }

    fn function_source(&self, rng: &mut dyn RngCore) -> String {
        let name = self.identifier(rng, 8);
        let params: Vec<String> = (0..rng.gen_range(0..=self.config.max_parameters))
            .map(|_| self.identifier(rng, 6))
            .collect();

        let mut code = format!("def {}({}):\n", name, params.join(", "));
        code.push_str("    \"\"\"Randomly generated function\"\"\"\n");
        let (low, high) = self.config.function_statements;
        for _ in 0..rng.gen_range(low..=high) {
            code.push_str(&self.statement(rng, 1));
        }
        code.push_str(&format!("    return {}\n", self.value(rng)));
        code
    }

    fn container_source(&self, rng: &mut dyn RngCore) -> String {
        let mut name = self.identifier(rng, 8);
        name[..1].make_ascii_uppercase();

        let mut code = format!("class {}:\n", name);
        code.push_str("    \"\"\"Randomly generated class\"\"\"\n");
        let (low, high) = self.config.methods_per_container;
        for _ in 0..rng.gen_range(low..=high) {
            code.push_str(&format!("    def {}(self):\n", self.identifier(rng, 8)));
            let (s_low, s_high) = self.config.method_statements;
            for _ in 0..rng.gen_range(s_low..=s_high) {
                code.push_str(&self.statement(rng, 2));
            }
            code.push_str(&format!("        return {}\n\n", self.value(rng)));
        }
        code
    }
}

impl ProgramGenerator for PythonProgramGenerator {
    fn program(&self, rng: &mut dyn RngCore) -> SearchResult<String> {
        let mut code = String::from("# randomly generated program\n\n");
        for _ in 0..self.config.functions_per_program {
            code.push_str(&self.function_source(rng));
            code.push_str("\n\n");
        }
        for _ in 0..self.config.containers_per_program {
            code.push_str(&self.container_source(rng));
            code.push('\n');
        }
        Ok(code)
    }

    fn function(&self, rng: &mut dyn RngCore) -> SearchResult<String> {
        Ok(self.function_source(rng))
    }

    fn container(&self, rng: &mut dyn RngCore) -> SearchResult<String> {
        Ok(self.container_source(rng))
    }
}

//! SAT solver integration using CaDiCaL

use super::constraints::{Cardinality, Clause, Constraint};
use anyhow::Result;
use cadical::Solver;
use log::{debug, trace};
use std::time::{Duration, Instant};

/// SAT oracle wrapping CaDiCaL.
///
/// Problem clauses are append-only. Temporary clauses live in a [`Scope`]:
/// each is guarded by a fresh selector variable that is assumed while the
/// scope is solved and permanently falsified when the scope closes.
pub struct SatSolver {
    solver: Solver,
    variable_count: usize,
    clause_count: usize,
    selector_floor: Option<i32>,
    next_selector: i32,
    last_result: Option<bool>,
    counters: SolveCounters,
}

/// A retractable group of clauses; close it with [`SatSolver::close_scope`]
#[must_use = "a scope must be closed to retract its clauses"]
#[derive(Debug)]
pub struct Scope {
    selector: i32,
}

impl Scope {
    pub fn selector(&self) -> i32 {
        self.selector
    }
}

#[derive(Debug, Clone, Default)]
struct SolveCounters {
    solve_calls: usize,
    satisfiable: usize,
    unsatisfiable: usize,
    scopes_opened: usize,
    solve_time: Duration,
}

/// Statistics about the solving process
#[derive(Debug, Clone)]
pub struct SolverStatistics {
    pub variable_count: usize,
    pub clause_count: usize,
    pub solve_calls: usize,
    pub satisfiable: usize,
    pub unsatisfiable: usize,
    pub scopes_opened: usize,
    pub solve_time: Duration,
}

impl SatSolver {
    /// Create a new SAT solver instance
    pub fn new() -> Self {
        Self {
            solver: Solver::new(),
            variable_count: 0,
            clause_count: 0,
            selector_floor: None,
            next_selector: 0,
            last_result: None,
            counters: SolveCounters::default(),
        }
    }

    /// Add constraints to the solver
    pub fn add_constraints(&mut self, constraints: &[Constraint]) -> Result<()> {
        for constraint in constraints {
            match constraint {
                Constraint::Clause(clause) => self.add_clause(clause)?,
                Constraint::Cardinality(cardinality) => self.add_cardinality(cardinality)?,
            }
        }
        Ok(())
    }

    /// Add a single clause to the solver
    pub fn add_clause(&mut self, clause: &Clause) -> Result<()> {
        if clause.is_empty() {
            anyhow::bail!("Cannot add empty clause (unsatisfiable)");
        }

        for &literal in &clause.literals {
            let var = self.check_problem_literal(literal)?;
            if var > self.variable_count {
                self.variable_count = var;
            }
        }

        self.solver.add_clause(clause.literals.iter().copied());
        self.clause_count += 1;
        Ok(())
    }

    /// Add a cardinality constraint as its clause encoding
    pub fn add_cardinality(&mut self, cardinality: &Cardinality) -> Result<()> {
        for clause in cardinality.to_clauses() {
            self.add_clause(&clause)?;
        }
        Ok(())
    }

    /// Solve under assumptions; `true` when clauses and assumptions are jointly satisfiable
    pub fn solve(&mut self, assumptions: &[i32]) -> Result<bool> {
        for &literal in assumptions {
            self.check_problem_literal(literal)?;
        }
        self.run(assumptions.iter().copied())
    }

    /// Signed literal per problem variable of the last satisfying assignment
    pub fn model(&self) -> Result<Vec<i32>> {
        if self.last_result != Some(true) {
            anyhow::bail!("No model available: last solve was not satisfiable");
        }

        let mut model = Vec::with_capacity(self.variable_count);
        for var in 1..=self.variable_count as i32 {
            match self.solver.value(var) {
                Some(true) => model.push(var),
                Some(false) => model.push(-var),
                None => trace!("variable {} unassigned in model", var),
            }
        }
        Ok(model)
    }

    /// Open a scope for retractable clauses
    pub fn open_scope(&mut self) -> Scope {
        let floor = *self
            .selector_floor
            .get_or_insert(self.variable_count as i32 + 1);
        if self.next_selector < floor {
            self.next_selector = floor;
        }

        let selector = self.next_selector;
        self.next_selector += 1;
        self.counters.scopes_opened += 1;
        trace!("opened scope with selector {}", selector);
        Scope { selector }
    }

    /// Add a clause that only holds while `scope` is solved
    pub fn add_scoped_clause(&mut self, scope: &Scope, clause: &Clause) -> Result<()> {
        if clause.is_empty() {
            anyhow::bail!("Cannot add empty clause (unsatisfiable)");
        }
        for &literal in &clause.literals {
            self.check_problem_literal(literal)?;
        }

        let guarded = clause
            .literals
            .iter()
            .copied()
            .chain(std::iter::once(-scope.selector));
        self.solver.add_clause(guarded);
        self.clause_count += 1;
        Ok(())
    }

    /// Add a cardinality constraint that only holds while `scope` is solved
    pub fn add_scoped_cardinality(&mut self, scope: &Scope, cardinality: &Cardinality) -> Result<()> {
        for clause in cardinality.to_clauses() {
            self.add_scoped_clause(scope, &clause)?;
        }
        Ok(())
    }

    /// Solve with the scope's clauses active
    pub fn solve_in_scope(&mut self, scope: &Scope, assumptions: &[i32]) -> Result<bool> {
        for &literal in assumptions {
            self.check_problem_literal(literal)?;
        }
        self.run(
            assumptions
                .iter()
                .copied()
                .chain(std::iter::once(scope.selector)),
        )
    }

    /// Retract every clause of the scope
    pub fn close_scope(&mut self, scope: Scope) -> Result<()> {
        self.solver.add_clause([-scope.selector]);
        self.clause_count += 1;
        trace!("closed scope with selector {}", scope.selector);
        Ok(())
    }

    /// Count solutions consistent with the assumptions, stopping at `limit`
    pub fn count_solutions(&mut self, assumptions: &[i32], limit: usize) -> Result<usize> {
        let scope = self.open_scope();
        let mut count = 0;

        while count < limit && self.solve_in_scope(&scope, assumptions)? {
            count += 1;
            let model = self.model()?;
            // Block the model we just found
            let blocking = Clause::new(model.iter().map(|&lit| -lit).collect());
            self.add_scoped_clause(&scope, &blocking)?;
        }

        self.close_scope(scope)?;
        Ok(count)
    }

    fn run<I>(&mut self, assumptions: I) -> Result<bool>
    where
        I: Iterator<Item = i32>,
    {
        let start_time = Instant::now();
        let result = self.solver.solve_with(assumptions);
        let elapsed = start_time.elapsed();

        self.counters.solve_calls += 1;
        self.counters.solve_time += elapsed;
        self.last_result = result;

        match result {
            Some(true) => {
                self.counters.satisfiable += 1;
                trace!("solve #{}: SAT in {:?}", self.counters.solve_calls, elapsed);
                Ok(true)
            }
            Some(false) => {
                self.counters.unsatisfiable += 1;
                trace!("solve #{}: UNSAT in {:?}", self.counters.solve_calls, elapsed);
                Ok(false)
            }
            None => anyhow::bail!("SAT solver stopped without a result"),
        }
    }

    fn check_problem_literal(&self, literal: i32) -> Result<usize> {
        if literal == 0 || literal == i32::MIN {
            anyhow::bail!("Invalid literal {}", literal);
        }
        let var = literal.unsigned_abs() as usize;
        if let Some(floor) = self.selector_floor {
            if var >= floor as usize {
                anyhow::bail!(
                    "Literal {} collides with scope selectors starting at {}",
                    literal,
                    floor
                );
            }
        }
        Ok(var)
    }

    /// Get solver statistics
    pub fn statistics(&self) -> SolverStatistics {
        SolverStatistics {
            variable_count: self.variable_count,
            clause_count: self.clause_count,
            solve_calls: self.counters.solve_calls,
            satisfiable: self.counters.satisfiable,
            unsatisfiable: self.counters.unsatisfiable,
            scopes_opened: self.counters.scopes_opened,
            solve_time: self.counters.solve_time,
        }
    }

    /// Get the number of problem variables
    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    /// Get the number of clauses
    pub fn clause_count(&self) -> usize {
        self.clause_count
    }

    /// Release the solver handle
    pub fn release(self) {
        debug!(
            "releasing SAT solver after {} solve calls ({:.3}s)",
            self.counters.solve_calls,
            self.counters.solve_time.as_secs_f64()
        );
    }
}

impl Default for SatSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SAT Solver Statistics:")?;
        writeln!(f, "  Variables: {}", self.variable_count)?;
        writeln!(f, "  Clauses: {}", self.clause_count)?;
        writeln!(
            f,
            "  Solve calls: {} ({} SAT, {} UNSAT)",
            self.solve_calls, self.satisfiable, self.unsatisfiable
        )?;
        writeln!(f, "  Scopes opened: {}", self.scopes_opened)?;
        writeln!(f, "  Solve time: {:.3}s", self.solve_time.as_secs_f64())?;
        Ok(())
    }
}

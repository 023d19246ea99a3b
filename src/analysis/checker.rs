//! Runs the usage analyzer over every parameter of every function.

use crate::analysis::interface_index::InterfaceIndex;
use crate::analyzers::usage::{analyze_param, Eligibility};
use crate::config::AnalysisSettings;
use crate::core::ast::{File, FuncDecl, Ident, Pos};
use crate::core::corpus::{Corpus, Package};
use crate::core::errors::Error;
use crate::core::method_map::MethodMap;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, debug_span, warn};

/// Eligible parameters of one function
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionReport {
    pub package: String,
    pub file: String,
    /// Position of the function name
    pub pos: Pos,
    pub function: String,
    pub params: Vec<ParamReport>,
}

impl FunctionReport {
    pub fn param(&self, name: &str) -> Option<&ParamReport> {
        self.params.iter().find(|p| p.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamReport {
    pub name: String,
    /// Required method names, sorted
    pub methods: Vec<String>,
    /// Method name to signature in Go syntax
    pub signatures: BTreeMap<String, String>,
    /// Exported interface with exactly these methods
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
}

/// A parameter whose analysis hit an internal inconsistency
#[derive(Debug)]
pub struct AnalysisFailure {
    pub package: String,
    pub function: String,
    pub param: String,
    pub pos: Pos,
    pub error: Error,
}

impl fmt::Display for AnalysisFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "analyzing parameter {} of {} at {} in package {}: {}",
            self.param, self.function, self.pos, self.package, self.error
        )
    }
}

impl std::error::Error for AnalysisFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Everything one check produced, in declaration order
#[derive(Debug, Default)]
pub struct CheckOutcome {
    pub reports: Vec<FunctionReport>,
    pub failures: Vec<AnalysisFailure>,
}

impl CheckOutcome {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn report(&self, function: &str) -> Option<&FunctionReport> {
        self.reports.iter().find(|r| r.function == function)
    }
}

#[derive(Debug, Default)]
struct FunctionOutcome {
    report: Option<FunctionReport>,
    failures: Vec<AnalysisFailure>,
}

/// One function awaiting analysis
#[derive(Clone, Copy)]
struct Job<'c> {
    package: &'c Package,
    file: &'c File,
    func: &'c FuncDecl,
}

pub struct Checker {
    corpus: Corpus,
    index: InterfaceIndex,
    settings: AnalysisSettings,
}

impl Checker {
    /// Builds the interface index up front; it is read-only afterwards.
    pub fn new(corpus: Corpus, settings: AnalysisSettings) -> Self {
        let index = if settings.suggest_names {
            InterfaceIndex::build(&corpus)
        } else {
            InterfaceIndex::default()
        };
        Self {
            corpus,
            index,
            settings,
        }
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn index(&self) -> &InterfaceIndex {
        &self.index
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    /// Suggested interface for a method set, if naming is enabled
    pub fn name_for_methods(&self, methods: &MethodMap) -> Option<&str> {
        if !self.settings.suggest_names {
            return None;
        }
        self.index.lookup(methods, &self.corpus.types)
    }

    pub fn check(&self) -> CheckOutcome {
        let jobs: Vec<Job<'_>> = self
            .corpus
            .roots()
            .flat_map(|package| {
                package
                    .functions()
                    .map(move |(file, func)| Job { package, file, func })
            })
            .collect();
        debug!(
            functions = jobs.len(),
            parallel = self.settings.parallel,
            "checking corpus"
        );

        let mut outcome = CheckOutcome::default();
        if self.settings.parallel {
            // collect() keeps declaration order
            let results: Vec<FunctionOutcome> =
                jobs.par_iter().map(|job| self.check_function(*job)).collect();
            for result in results {
                if self.absorb(&mut outcome, result) {
                    break;
                }
            }
        } else {
            for job in jobs {
                let result = self.check_function(job);
                if self.absorb(&mut outcome, result) {
                    break;
                }
            }
        }

        debug!(
            reports = outcome.reports.len(),
            failures = outcome.failures.len(),
            "check finished"
        );
        outcome
    }

    /// Returns true when checking should stop
    fn absorb(&self, outcome: &mut CheckOutcome, result: FunctionOutcome) -> bool {
        let failed = !result.failures.is_empty();
        outcome.reports.extend(result.report);
        outcome.failures.extend(result.failures);
        failed && self.settings.fail_fast
    }

    fn check_function(&self, job: Job<'_>) -> FunctionOutcome {
        let Job {
            package,
            file,
            func,
        } = job;
        let _span = debug_span!(
            "check_function",
            package = %package.path,
            function = %func.name.name
        )
        .entered();

        let oracle = self.corpus.oracle(package);
        let mut outcome = FunctionOutcome::default();
        let mut params = Vec::new();

        for param in func.params().filter(|p| !p.is_blank()) {
            match analyze_param(param, func, &oracle) {
                Ok(Eligibility::Eligible(methods)) => {
                    if methods.is_empty() && !self.settings.include_unused {
                        continue;
                    }
                    params.push(self.param_report(param, &methods));
                }
                Ok(Eligibility::Ineligible) => {}
                Err(error) => {
                    warn!(param = %param.name, %error, "analysis failed");
                    outcome.failures.push(AnalysisFailure {
                        package: package.path.clone(),
                        function: func.name.name.clone(),
                        param: param.name.clone(),
                        pos: param.pos,
                        error,
                    });
                    if self.settings.fail_fast {
                        break;
                    }
                }
            }
        }

        if !params.is_empty() || self.settings.include_empty {
            outcome.report = Some(FunctionReport {
                package: package.path.clone(),
                file: file.path.clone(),
                pos: func.name.pos,
                function: func.name.name.clone(),
                params,
            });
        }
        outcome
    }

    fn param_report(&self, param: &Ident, methods: &MethodMap) -> ParamReport {
        ParamReport {
            name: param.name.clone(),
            methods: methods.names().map(str::to_string).collect(),
            signatures: methods.signatures(&self.corpus.types),
            interface: self.name_for_methods(methods).map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ast::UnaryOp;
    use crate::testkit::fixtures::{IO, OS};
    use crate::testkit::{stmt, CorpusBuilder, PackageBuilder, Stdlib};
    use pretty_assertions::assert_eq;

    const M: &str = "example.com/m";

    fn corpus_with<F>(build: F) -> Corpus
    where
        F: FnOnce(&mut PackageBuilder<'_>, Stdlib),
    {
        let mut corpus = CorpusBuilder::new();
        let std = Stdlib::install(&mut corpus);
        let mut pkg = corpus.package(M);
        pkg.import(IO).import(OS);
        build(&mut pkg, std);
        pkg.finish();
        corpus.root(M);
        corpus.build()
    }

    /// `Read(r)` reads, `Close(c)` closes, `Addr(f)` takes `&f`,
    /// `Broken(r)` returns r from a function without results.
    fn sample() -> Corpus {
        corpus_with(|pkg, std| {
            pkg.func("Read", &[("r", std.file_ptr), ("_", std.int)], &[], |pb, p| {
                let r = pb.ident(p[0]);
                let read_all = pb.qualified(std.read_all);
                vec![stmt::expr(pb.call(read_all, vec![r]))]
            });
            pkg.func("Addr", &[("f", std.file)], &[], |pb, p| {
                let f = pb.ident(p[0]);
                let addr = pb.unary(UnaryOp::Addr, f);
                vec![stmt::expr(addr)]
            });
            pkg.func("Broken", &[("r", std.file_ptr)], &[], |pb, p| {
                let r = pb.ident(p[0]);
                vec![stmt::ret(vec![r])]
            });
            pkg.func("Unused", &[("r", std.file_ptr)], &[], |_, _| vec![]);
            pkg.func("Close", &[("c", std.file_ptr)], &[], |pb, p| {
                let c = pb.ident(p[0]);
                let close = pb.select(c, "Close");
                vec![stmt::defer(pb.call(close, vec![]))]
            });
        })
    }

    fn settings() -> AnalysisSettings {
        AnalysisSettings {
            parallel: false,
            ..Default::default()
        }
    }

    fn names(outcome: &CheckOutcome) -> Vec<&str> {
        outcome.reports.iter().map(|r| r.function.as_str()).collect()
    }

    #[test]
    fn test_reports_in_declaration_order() {
        let outcome = Checker::new(sample(), settings()).check();

        assert_eq!(names(&outcome), vec!["Read", "Unused", "Close"]);
        let read = outcome.report("Read").unwrap();
        assert_eq!(read.package, M);
        assert_eq!(read.file, "example.com/m/m.go");
        assert_eq!(
            read.params,
            vec![ParamReport {
                name: "r".to_string(),
                methods: vec!["Read".to_string()],
                signatures: BTreeMap::from([(
                    "Read".to_string(),
                    "func([]byte) (int, error)".to_string()
                )]),
                interface: Some("io.Reader".to_string()),
            }]
        );
        assert_eq!(
            outcome.report("Close").unwrap().params[0].interface.as_deref(),
            Some("io.Closer")
        );
    }

    #[test]
    fn test_failures_name_function_and_parameter() {
        let outcome = Checker::new(sample(), settings()).check();

        assert_eq!(outcome.failures.len(), 1);
        let failure = &outcome.failures[0];
        assert_eq!(failure.function, "Broken");
        assert_eq!(failure.param, "r");
        assert!(failure.error.is_inconsistency());
        let message = failure.to_string();
        assert!(message.starts_with("analyzing parameter r of Broken at "));
        assert!(message.contains("in package example.com/m"));
    }

    #[test]
    fn test_fail_fast_stops_at_first_failure() {
        let outcome = Checker::new(
            sample(),
            AnalysisSettings {
                fail_fast: true,
                ..settings()
            },
        )
        .check();

        assert_eq!(names(&outcome), vec!["Read"]);
        assert_eq!(outcome.failures.len(), 1);
    }

    #[test]
    fn test_include_empty_keeps_functions_without_eligible_params() {
        let outcome = Checker::new(
            sample(),
            AnalysisSettings {
                include_empty: true,
                ..settings()
            },
        )
        .check();

        assert_eq!(
            names(&outcome),
            vec!["Read", "Addr", "Broken", "Unused", "Close"]
        );
        assert!(outcome.report("Addr").unwrap().params.is_empty());
    }

    #[test]
    fn test_exclude_unused() {
        let outcome = Checker::new(
            sample(),
            AnalysisSettings {
                include_unused: false,
                ..settings()
            },
        )
        .check();

        assert_eq!(names(&outcome), vec!["Read", "Close"]);
    }

    #[test]
    fn test_without_name_suggestions() {
        let checker = Checker::new(
            sample(),
            AnalysisSettings {
                suggest_names: false,
                ..settings()
            },
        );
        assert!(checker.index().is_empty());

        let outcome = checker.check();
        assert!(outcome.reports.iter().flat_map(|r| &r.params).all(|p| p.interface.is_none()));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let sequential = Checker::new(sample(), settings()).check();
        let parallel = Checker::new(
            sample(),
            AnalysisSettings {
                parallel: true,
                ..settings()
            },
        )
        .check();

        assert_eq!(parallel.reports, sequential.reports);
        assert_eq!(parallel.failures.len(), sequential.failures.len());
    }

    #[test]
    fn test_roots_limit_checked_packages() {
        let mut corpus = CorpusBuilder::new();
        let std = Stdlib::install(&mut corpus);
        for path in ["example.com/a", "example.com/b"] {
            let mut pkg = corpus.package(path);
            pkg.import(IO);
            pkg.func("F", &[("r", std.file_ptr)], &[], |pb, p| {
                let r = pb.ident(p[0]);
                let read_all = pb.qualified(std.read_all);
                vec![stmt::expr(pb.call(read_all, vec![r]))]
            });
            pkg.finish();
        }
        corpus.root("example.com/b");

        let outcome = Checker::new(corpus.build(), settings()).check();
        assert_eq!(outcome.reports.len(), 1);
        assert_eq!(outcome.reports[0].package, "example.com/b");
    }
}

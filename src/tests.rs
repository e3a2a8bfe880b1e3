#[cfg(test)]
mod tests {
    use std::num::NonZero;
    use std::time::Duration;

    use strum::VariantArray;
    use varisat::{CnfFormula, Lit, Var};

    use crate::assignment::Assignment;
    use crate::board::Board;
    use crate::builder::{Builder, BuilderInvalidReason, SquareBoardBuilder};
    use crate::config::{ConfigError, SolverConfig};
    use crate::connectivity::{component_labels, is_connected};
    use crate::error::{BoardError, OracleError, SolveError, Violation};
    use crate::location::Location;
    use crate::shape::Orientation;
    use crate::solver::{self, Deadline, EdgeOrder, Refinement, SatOracle, SatRefinement, SearchStats, StrategyKind};

    const CORNERS: &str = "2 0 2
0 0 0
2 0 2";

    // unique solution
    const SAMPLE: &str = "0,2,0,5,0,0,2
0,0,0,0,0,0,0
4,0,2,0,2,0,4
0,0,0,0,0,0,0
0,1,0,5,0,2,0
0,0,0,0,0,0,0
4,0,0,0,0,0,3";

    const SAMPLE_SOLVED: &str = ".2=5--2
...║..|
4=2║2=4
║..║..|
║1-5=2|
║.....|
4=====3
";

    // the only degree-exact assignment leaves two pairs apart
    const TWO_PAIRS: &str = "1 1 0 0
0 0 0 0
0 0 1 1";

    fn board(text: &str) -> Board {
        text.parse().unwrap()
    }

    fn configs() -> impl Iterator<Item = SolverConfig> {
        StrategyKind::VARIANTS.iter().map(|kind| SolverConfig::new().with_strategy(*kind))
    }

    #[test]
    fn parse_and_print() {
        assert_eq!(format!("{}", board(CORNERS)), "2.2
...
2.2
");

        assert_eq!(format!("{}", board(SAMPLE)), ".2.5..2
.......
4.2.2.4
.......
.1.5.2.
.......
4.....3
");

        // blank lines are skipped, commas and spaces mix freely
        assert_eq!(board("\n1, 0 ,1\n\n").to_string(), "1.1\n");
    }

    #[test]
    fn parse_errors() {
        assert!(matches!("".parse::<Board>(), Err(BoardError::Empty)));
        assert!(matches!("1,1\n1".parse::<Board>(), Err(BoardError::Ragged { row: 1, expected: 2, found: 1 })));
        assert!(matches!("1 x".parse::<Board>(), Err(BoardError::BadToken { row: 0, token }) if token == "x"));
        assert!(matches!("1 -1".parse::<Board>(), Err(BoardError::BadToken { .. })));

        match "9 1".parse::<Board>() {
            Err(BoardError::Invalid(reasons)) => assert_eq!(reasons, vec![BuilderInvalidReason::IslandValueOutOfRange]),
            other => panic!("expected an invalid board, got {other:?}"),
        }
    }

    #[test]
    fn remove_islands() {
        let board = SquareBoardBuilder::with_dims((NonZero::new(3).unwrap(), NonZero::new(2).unwrap()))
            .add_island(Location(0, 0), 1)
            .add_island(Location(2, 0), 1)
            .add_island(Location(1, 1), 4)
            .pop_island()
            .build()
            .unwrap();

        assert_eq!(format!("{}", board), "1.1
...
");

        let board = SquareBoardBuilder::with_dims((NonZero::new(3).unwrap(), NonZero::new(1).unwrap()))
            .add_island(Location(0, 0), 1)
            .add_island(Location(2, 0), 1)
            .drop_location(Location(0, 0))
            .pop_island()
            .build()
            .unwrap();

        assert_eq!(format!("{}", board), "...\n");
    }

    #[test]
    fn builder_out_of_bounds() {
        let mut builder = SquareBoardBuilder::with_dims((NonZero::new(2).unwrap(), NonZero::new(2).unwrap()));
        builder.add_island(Location(2, 0), 1);
        // ignored once invalid
        builder.add_island(Location(0, 0), 9);

        assert_eq!(builder.is_valid(), Some(&vec![BuilderInvalidReason::FeatureOutOfBounds]));
        assert_eq!(builder.build().unwrap_err(), &vec![BuilderInvalidReason::FeatureOutOfBounds]);
    }

    #[test]
    fn candidate_edges() {
        let map = board(CORNERS).island_map();

        assert_eq!(map.islands().iter().map(|island| island.location).collect::<Vec<_>>(),
                   vec![Location(0, 0), Location(2, 0), Location(0, 2), Location(2, 2)]);
        assert_eq!(map.edges().iter().map(|edge| (edge.endpoints, edge.orientation)).collect::<Vec<_>>(), vec![
            ((0, 1), Orientation::Horizontal),
            ((0, 2), Orientation::Vertical),
            ((1, 3), Orientation::Vertical),
            ((2, 3), Orientation::Horizontal),
        ]);
        assert_eq!(map.incident(3).collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(map.edge_between(3, 1), Some(2));
        assert_eq!(map.edge_between(0, 3), None);
    }

    #[test]
    fn islands_block_line_of_sight() {
        let map = board("1 2 1").island_map();

        assert_eq!(map.edges().iter().map(|edge| edge.endpoints).collect::<Vec<_>>(), vec![(0, 1), (1, 2)]);
        assert_eq!(map.edge_between(0, 2), None);

        let map = board("1\n0\n3\n0\n1").island_map();
        assert_eq!(map.edges().iter().map(|edge| (edge.endpoints, edge.orientation)).collect::<Vec<_>>(),
                   vec![((0, 1), Orientation::Vertical), ((1, 2), Orientation::Vertical)]);
    }

    #[test]
    fn crossing_detection() {
        let model = board("0 1 0
1 0 1
0 1 0").constraint_model();

        assert_eq!(model.edge_count(), 2);
        assert!(model.crosses(0, 1));
        assert!(model.crosses(1, 0));
        assert_eq!(model.crossing_pairs().len(), 1);
        assert_eq!(model.crossings_of(0), &[1]);

        // edges sharing an endpoint do not cross
        let model = board(CORNERS).constraint_model();
        assert!(model.crossing_pairs().is_empty());
    }

    #[test]
    fn crossing_only_board_is_exhausted() {
        let board = board("0 1 0
1 0 1
0 1 0");

        for config in configs() {
            let report = board.report(&config);
            assert!(matches!(report.outcome, Err(SolveError::SearchExhausted)), "{}", config.strategy);
            assert!(!report.timed_out());
            assert!(!report.connected());
        }
    }

    #[test]
    fn capacity_check() {
        for config in configs() {
            let report = board("3 0 1").report(&config);
            match &report.outcome {
                Err(SolveError::StructurallyInfeasible { island, location, required, capacity }) => {
                    assert_eq!((*island, *location, *required, *capacity), (0, Location(0, 0), 3, 2));
                }
                other => panic!("{}: expected structural infeasibility, got {other:?}", config.strategy),
            }
            assert!(report.error().is_some_and(SolveError::is_definitive));
            assert_eq!(report.stats, SearchStats::default());
            if config.strategy.counts_nodes() {
                assert_eq!(report.nodes_expanded(), Some(0));
            } else {
                assert_eq!(report.nodes_expanded(), None);
            }
        }

        // an island on its own has nowhere to send a bridge
        assert!(matches!(
            board("4").report(&SolverConfig::new()).outcome,
            Err(SolveError::StructurallyInfeasible { required: 4, capacity: 0, .. }),
        ));
    }

    #[test]
    fn mismatched_pair_is_exhausted() {
        for config in configs() {
            let report = board("1 0 2").report(&config);
            assert!(matches!(report.outcome, Err(SolveError::SearchExhausted)), "{}", config.strategy);
        }
    }

    #[test]
    fn encoding_shape() {
        let model = board(CORNERS).constraint_model();
        let encoding = model.encode();

        assert_eq!(encoding.var_count(), 8);
        // one implication per edge, then 4 + 4 cardinality clauses per island of two edges
        assert_eq!(encoding.formula().len(), 4 + 4 * 8);
        assert_eq!(encoding.vars(0).at_least_one.to_dimacs(), 1);
        assert_eq!(encoding.vars(0).double.to_dimacs(), 2);
        assert_eq!(encoding.vars(3).double.to_dimacs(), 8);

        let crossing = board("0 1 0
1 0 1
0 1 0").constraint_model().encode();
        // 2 implications, 4 islands with exactly 1 of 2 literals, and the crossing clause
        assert_eq!(crossing.formula().len(), 2 + 4 * 2 + 1);
    }

    #[test]
    fn connectivity() {
        assert!(is_connected(0, []));
        assert!(is_connected(1, []));
        assert!(!is_connected(3, [(0, 1)]));
        assert!(is_connected(3, [(0, 1), (2, 1)]));
        assert!(!is_connected(4, [(0, 1), (2, 3)]));

        assert_eq!(component_labels(4, [(2, 3)]), vec![0, 1, 2, 2]);
        assert_eq!(component_labels(4, [(3, 0), (1, 2)]), vec![0, 1, 1, 0]);
    }

    #[test]
    fn verify_assignments() {
        let model = board(CORNERS).constraint_model();

        assert_eq!(model.verify(&Assignment::from_counts(vec![1, 1, 1, 1])), Ok(()));
        assert_eq!(model.verify(&Assignment::from_counts(vec![2, 0, 0, 2])), Err(Violation::Disconnected));
        assert_eq!(model.verify_structure(&Assignment::from_counts(vec![2, 0, 0, 2])), Ok(()));
        assert_eq!(
            model.verify(&Assignment::from_counts(vec![1, 1, 1, 0])),
            Err(Violation::DegreeMismatch { island: 2, degree: 1, required: 2 }),
        );
        assert_eq!(
            model.verify(&Assignment::from_counts(vec![1, 1])),
            Err(Violation::WrongLength { expected: 4, found: 2 }),
        );
        assert_eq!(
            model.verify(&Assignment::from_counts(vec![3, 0, 0, 0])),
            Err(Violation::CountOutOfRange { edge: 0, count: 3 }),
        );

        let model = board("0 2 0
2 0 2
0 2 0").constraint_model();
        assert_eq!(model.verify_structure(&Assignment::from_counts(vec![2, 2])), Err(Violation::Crossing(0, 1)));
    }

    #[test]
    fn solve_corners() {
        for config in configs() {
            let solved = board(CORNERS).solve(&config).unwrap();
            assert_eq!(format!("{}", solved), "2-2
|.|
2-2
", "{}", config.strategy);
            assert_eq!(solved.solution().len(), 4);
            assert_eq!(solved.solution().total_bridges(), 4);
        }
    }

    #[test]
    fn solve_single_pair() {
        for config in configs() {
            let solved = board("1 1").solve(&config).unwrap();
            assert_eq!(format!("{}", solved), "11\n");

            let bridges = solved.solution().bridges();
            assert_eq!(bridges.len(), 1);
            assert_eq!((bridges[0].from, bridges[0].to, bridges[0].count), (0, 1, 1));
            assert_eq!(bridges[0].orientation, Orientation::Horizontal);
            assert_eq!(bridges[0].ends, (Location(0, 0), Location(1, 0)));
        }
    }

    #[test]
    fn solve_sample() {
        for config in configs() {
            let report = board(SAMPLE).report(&config);
            assert!(report.success(), "{}: {:?}", config.strategy, report.error());
            assert!(report.connected());
            assert!(!report.timed_out());

            let solved = board(SAMPLE).solve(&config).unwrap();
            assert_eq!(format!("{}", solved), SAMPLE_SOLVED, "{}", config.strategy);

            let solution = solved.solution();
            let model = solved.board().constraint_model();
            for island in model.islands() {
                assert_eq!(solution.degree(island.id), island.required);
            }
        }
    }

    #[test]
    fn solve_with_natural_order() {
        let config = SolverConfig::new().with_edge_order(EdgeOrder::Natural);
        for kind in [StrategyKind::Backtracking, StrategyKind::BestFirst] {
            let solved = board(SAMPLE).solve(&config.clone().with_strategy(kind)).unwrap();
            assert_eq!(format!("{}", solved), SAMPLE_SOLVED);
        }
    }

    #[test]
    fn edge_orders() {
        let model = board("2 0 2
0 0 0
1 0 1").constraint_model();

        assert_eq!(EdgeOrder::Natural.arrange(&model), vec![0, 1, 2, 3]);
        // ties keep generation order
        assert_eq!(EdgeOrder::TightestFirst.arrange(&model), vec![3, 1, 2, 0]);
    }

    #[test]
    fn strategies_agree() {
        // two solutions; every strategy must find a valid one, and the same one every time
        let board = board("3 3\n3 3");
        let model = board.constraint_model();

        for config in configs() {
            let first = board.report(&config);
            let second = board.report(&config);
            let (first, second) = (first.solution().unwrap(), second.solution().unwrap());

            assert_eq!(first, second, "{}", config.strategy);
            assert_eq!(first.total_bridges(), 6);
            for island in model.islands() {
                assert_eq!(first.degree(island.id), 3);
            }
        }
    }

    #[test]
    fn disconnected_models_are_refined_away() {
        for refinement in Refinement::VARIANTS {
            let config = SolverConfig::new().with_strategy(StrategyKind::Sat).with_refinement(*refinement);
            let report = board(TWO_PAIRS).report(&config);

            assert!(matches!(report.outcome, Err(SolveError::SearchExhausted)), "{refinement}");
            assert_eq!(report.stats.oracle_calls, 2);
            assert_eq!(report.stats.refinements, 1);
            assert_eq!(report.nodes_expanded(), None);
        }

        for kind in [StrategyKind::Backtracking, StrategyKind::BestFirst, StrategyKind::BruteForce] {
            let report = board(TWO_PAIRS).report(&SolverConfig::new().with_strategy(kind));
            assert!(matches!(report.outcome, Err(SolveError::SearchExhausted)), "{kind}");
            assert!(report.nodes_expanded().is_some_and(|nodes| nodes > 0));
        }
    }

    #[test]
    fn zero_budget_times_out() {
        let model = board(SAMPLE).constraint_model();

        for kind in StrategyKind::VARIANTS {
            let strategy = kind.build(&SolverConfig::new());
            let report = solver::run(&model, strategy.as_ref(), Some(Duration::ZERO));

            assert!(report.timed_out(), "{kind}");
            assert!(!report.success());
            assert!(matches!(report.error(), Some(SolveError::TimedOut { .. })));
            assert!(!report.error().unwrap().is_definitive());
        }
    }

    #[test]
    fn zero_required_island() {
        let board = SquareBoardBuilder::with_dims((NonZero::new(1).unwrap(), NonZero::new(1).unwrap()))
            .add_island(Location(0, 0), 0)
            .build()
            .unwrap();

        for config in configs() {
            let solved = board.clone().solve(&config).unwrap();
            assert!(solved.solution().is_empty());
            assert_eq!(format!("{}", solved), "0\n");
        }
    }

    #[test]
    fn deadline_checks_clock_first() {
        let mut deadline = Deadline::new(Some(Duration::ZERO));
        assert!(deadline.check().unwrap_err().is_timeout());

        let mut deadline = Deadline::unlimited();
        for _ in 0..5000 {
            assert!(deadline.check().is_ok());
        }
    }

    /// Answers every query with the same model.
    struct FixedOracle(Vec<Lit>);

    impl SatOracle for FixedOracle {
        fn add_formula(&mut self, _formula: &CnfFormula) {}

        fn add_clause(&mut self, _clause: &[Lit]) {}

        fn solve(&mut self) -> Result<Option<Vec<Lit>>, OracleError> {
            Ok(Some(self.0.clone()))
        }
    }

    /// Hands out the given models in order, then reports UNSAT; remembers the clauses it was given.
    struct ScriptedOracle {
        models: Vec<Vec<Lit>>,
        clauses: Vec<Vec<Lit>>,
    }

    impl ScriptedOracle {
        fn new(assignments: &[&[u8]]) -> Self {
            // edge e owns variables 2e and 2e + 1
            let models = assignments.iter()
                .rev()
                .map(|counts| counts.iter()
                    .enumerate()
                    .flat_map(|(edge, count)| [Var::from_index(2 * edge).lit(*count >= 1), Var::from_index(2 * edge + 1).lit(*count == 2)])
                    .collect())
                .collect();
            Self { models, clauses: Vec::new() }
        }
    }

    impl SatOracle for ScriptedOracle {
        fn add_formula(&mut self, _formula: &CnfFormula) {}

        fn add_clause(&mut self, clause: &[Lit]) {
            self.clauses.push(clause.to_vec());
        }

        fn solve(&mut self) -> Result<Option<Vec<Lit>>, OracleError> {
            Ok(self.models.pop())
        }
    }

    #[test]
    fn refine_then_accept() {
        let model = board(CORNERS).constraint_model();

        for refinement in Refinement::VARIANTS {
            // two double bridges satisfy every degree but leave two halves
            let mut oracle = ScriptedOracle::new(&[&[2, 0, 0, 2], &[1, 1, 1, 1]]);
            let mut stats = SearchStats::default();
            let assignment = solver::sat::refine(&model, &mut oracle, *refinement, &mut Deadline::unlimited(), &mut stats).unwrap();

            assert_eq!(assignment, Assignment::from_counts(vec![1, 1, 1, 1]), "{refinement}");
            assert_eq!((stats.oracle_calls, stats.refinements), (2, 1));
            assert_eq!(oracle.clauses.len(), 1);
            match refinement {
                // both indicators of all four edges, each negated
                Refinement::BlockModel => assert_eq!(oracle.clauses[0].len(), 8),
                // island 0's half {0, 1} is left only along edges 1 and 2
                Refinement::CutComponent => assert_eq!(oracle.clauses[0], vec![Var::from_index(2).positive(), Var::from_index(4).positive()]),
            }
        }

        // the same path through the real solver
        for refinement in Refinement::VARIANTS {
            let config = SolverConfig::new().with_strategy(StrategyKind::Sat).with_refinement(*refinement);
            let report = board(CORNERS).report(&config);

            assert!(report.success(), "{refinement}");
            assert!(report.stats.refinements >= 1, "{refinement}");
            assert_eq!(report.stats.oracle_calls, report.stats.refinements + 1);
        }
    }

    #[test]
    fn lying_oracle() {
        let model = board("1 1").constraint_model();
        let (a, d) = (Var::from_index(0), Var::from_index(1));

        // a second bridge without a first
        let mut oracle = FixedOracle(vec![a.negative(), d.positive()]);
        let outcome = solver::sat::refine(&model, &mut oracle, Refinement::BlockModel, &mut Deadline::unlimited(), &mut SearchStats::default());
        assert!(matches!(outcome, Err(SolveError::Oracle(OracleError::MalformedModel(_)))));

        // no bridges at all
        let mut oracle = FixedOracle(vec![a.negative(), d.negative()]);
        let outcome = solver::sat::refine(&model, &mut oracle, Refinement::BlockModel, &mut Deadline::unlimited(), &mut SearchStats::default());
        assert!(matches!(
            outcome,
            Err(SolveError::Oracle(OracleError::InvalidModel(Violation::DegreeMismatch { island: 0, degree: 0, required: 1 }))),
        ));

        // a model missing variables
        let strategy = SatRefinement::with_oracle(Refinement::BlockModel, || Box::new(FixedOracle(vec![])));
        let report = solver::run(&model, &strategy, None);
        assert!(matches!(report.outcome, Err(SolveError::Oracle(OracleError::MalformedModel(_)))));
        assert_eq!(report.stats.oracle_calls, 1);
    }

    #[test]
    fn config_from_toml() {
        let config = SolverConfig::from_toml_str(r#"
strategy = "best_first"
time_limit_ms = 1500
edge_order = "natural"
refinement = "cut_component"
"#).unwrap();

        assert_eq!(config.strategy, StrategyKind::BestFirst);
        assert_eq!(config.time_limit(), Some(Duration::from_millis(1500)));
        assert_eq!(config.edge_order, EdgeOrder::Natural);
        assert_eq!(config.refinement, Refinement::CutComponent);

        assert_eq!(SolverConfig::from_toml_str("").unwrap(), SolverConfig::default());
        assert_eq!(SolverConfig::default().time_limit(), None);

        assert!(matches!(SolverConfig::from_toml_str(r#"strategy = "genetic""#), Err(ConfigError::Toml(_))));
        assert!(matches!(SolverConfig::from_toml_str("time_limit_ms = 0"), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn strategy_names() {
        assert_eq!(StrategyKind::VARIANTS.iter().map(ToString::to_string).collect::<Vec<_>>(),
                   vec!["backtracking", "best_first", "brute_force", "sat"]);
        assert_eq!(StrategyKind::Sat.default_time_limit(), Duration::from_secs(60));
        assert_eq!(StrategyKind::BestFirst.default_time_limit(), Duration::from_secs(30));
    }
}

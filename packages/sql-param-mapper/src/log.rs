// Log targets used in events like `debug!(target: PREDICATE, "...")`.
// Subscribers can filter on these, e.g. `RUST_LOG=sql_param_mapper::predicate=trace`.
pub(crate) const ANALYZER: &str = "sql_param_mapper::analyzer";
pub(crate) const PARSER: &str = "sql_param_mapper::parser";
pub(crate) const PREDICATE: &str = "sql_param_mapper::predicate";
pub(crate) const SCOPE: &str = "sql_param_mapper::scope";
pub(crate) const STATEMENT: &str = "sql_param_mapper::statement";

#[cfg(test)]
pub(crate) fn log_targets() -> Vec<&'static str> {
    vec![ANALYZER, PARSER, PREDICATE, SCOPE, STATEMENT]
}

#[cfg(test)]
mod test {
    use super::log_targets;

    #[test]
    fn targets_are_namespaced_by_crate() {
        for target in log_targets() {
            assert!(target.starts_with("sql_param_mapper::"), "{target}");
        }
    }
}

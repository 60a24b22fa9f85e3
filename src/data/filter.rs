use std::collections::HashSet;

use super::model::{ExpressionRecord, UnifiedTable};

/// Resolve the user's gene selection into the row order of the heatmap.
///
/// * An empty selection means every gene, in first-occurrence order.
/// * Repeated ids keep their first position.
pub fn resolve_genes(table: &UnifiedTable, selected: &[String]) -> Vec<String> {
    if selected.is_empty() {
        return table.gene_ids().to_vec();
    }
    let mut seen = HashSet::new();
    selected
        .iter()
        .filter(|g| seen.insert(g.as_str()))
        .cloned()
        .collect()
}

/// Return the records whose gene is in `genes`, in table order.
pub fn filter_records<'a>(table: &'a UnifiedTable, genes: &[String]) -> Vec<&'a ExpressionRecord> {
    let wanted: HashSet<&str> = genes.iter().map(String::as_str).collect();
    table
        .records()
        .iter()
        .filter(|r| wanted.contains(r.gene_id.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::record;

    fn table() -> UnifiedTable {
        UnifiedTable::new(
            vec![
                record("G1", "c1", Some(1.0)),
                record("G2", "c1", Some(2.0)),
                record("G3", "c1", Some(3.0)),
                record("G2", "c2", Some(-2.0)),
            ],
            vec!["c1".into(), "c2".into()],
        )
    }

    #[test]
    fn test_empty_selection_means_all_genes() {
        assert_eq!(resolve_genes(&table(), &[]), ["G1", "G2", "G3"]);
    }

    #[test]
    fn test_selection_order_kept_and_deduplicated() {
        let selected: Vec<String> = ["G3", "G1", "G3"].iter().map(|s| s.to_string()).collect();
        assert_eq!(resolve_genes(&table(), &selected), ["G3", "G1"]);
    }

    #[test]
    fn test_filter_keeps_table_order() {
        let t = table();
        let rows = filter_records(&t, &["G2".to_string(), "missing".to_string()]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].comparison, "c1");
        assert_eq!(rows[1].comparison, "c2");
    }
}

use std::collections::BTreeMap;

pub fn labels_for_reload(source_id: &str, outcome: &str) -> BTreeMap<&'static str, String> {
    let mut map = BTreeMap::new();
    map.insert("source", source_id.to_string());
    map.insert("outcome", outcome.to_string());
    map
}

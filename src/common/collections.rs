use std::collections::HashMap;
use std::hash::Hash;

/// Swaps the two key levels of a nested map: `k1 -> k2 -> v` becomes
/// `k2 -> k1 -> v`. Every entry ends up exactly once in the result and no
/// empty inner map is produced.
///
/// Used to turn `locale -> field -> text` into `field -> locale -> text`.
pub fn swap_map_keys<K1, K2, V>(map_of_maps: &HashMap<K1, HashMap<K2, V>>) -> HashMap<K2, HashMap<K1, V>>
where
    K1: Eq + Hash + Clone,
    K2: Eq + Hash + Clone,
    V: Clone,
{
    let mut result: HashMap<K2, HashMap<K1, V>> = HashMap::new();

    for (k1, inner) in map_of_maps {
        for (k2, value) in inner {
            result
                .entry(k2.clone())
                .or_default()
                .insert(k1.clone(), value.clone());
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_swap_map_keys() {
        let mut locale_field_texts = HashMap::new();
        locale_field_texts.insert("en".to_string(), map(&[("title", "Title"), ("body", "Body")]));
        locale_field_texts.insert("da".to_string(), map(&[("title", "Titel")]));

        let swapped = swap_map_keys(&locale_field_texts);

        assert_eq!(swapped.len(), 2);
        assert_eq!(swapped["title"], map(&[("en", "Title"), ("da", "Titel")]));
        // body has no Danish text, so no (body, da) entry appears
        assert_eq!(swapped["body"], map(&[("en", "Body")]));
    }

    #[test]
    fn test_swap_preserves_entry_count() {
        let mut input = HashMap::new();
        input.insert("en".to_string(), map(&[("a", "1"), ("b", "2"), ("c", "3")]));
        input.insert("pl".to_string(), map(&[("b", "4")]));
        input.insert("da".to_string(), HashMap::new());

        let swapped = swap_map_keys(&input);

        let before: usize = input.values().map(HashMap::len).sum();
        let after: usize = swapped.values().map(HashMap::len).sum();
        assert_eq!(before, after);
        assert!(swapped.values().all(|inner| !inner.is_empty()));
        assert!(!swapped.values().any(|inner| inner.contains_key("da")));
    }

    #[test]
    fn test_swap_empty() {
        let input: HashMap<String, HashMap<String, String>> = HashMap::new();
        assert!(swap_map_keys(&input).is_empty());
    }
}

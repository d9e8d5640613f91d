use rand::Rng;

/// Returns a uniformly shuffled copy of `items` using the Fisher-Yates algorithm.
///
/// The input slice is left untouched, so callers holding on to the unshuffled
/// order keep it. Inputs with zero or one element come back as-is.
///
/// # Arguments
///
/// * `items`: The values to shuffle.
/// * `rng`: The random source. Pass `rand::thread_rng()` in production and a
///   seeded `StdRng` in tests.
pub fn shuffle_options<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut shuffled = items.to_vec();
    for i in (1..shuffled.len()).rev() {
        let j = rng.gen_range(0..=i);
        shuffled.swap(i, j);
    }
    shuffled
}

/// Decodes the HTML entities Open Trivia DB embeds in its default encoding.
///
/// Covers the full HTML5 named-entity table plus decimal (`&#039;`) and
/// hexadecimal (`&#x27;`) character references. Anything that does not parse
/// as an entity is copied through verbatim.
pub fn decode_html_entities(input: &str) -> String {
    html_escape::decode_html_entities(input).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_shuffle_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        let input = vec!["Paris", "Rome", "Berlin", "Madrid", "Oslo"];

        for _ in 0..100 {
            let shuffled = shuffle_options(&input, &mut rng);
            assert_eq!(shuffled.len(), input.len());

            let mut sorted_in = input.clone();
            let mut sorted_out = shuffled.clone();
            sorted_in.sort();
            sorted_out.sort();
            assert_eq!(sorted_in, sorted_out);
        }
    }

    #[test]
    fn test_shuffle_keeps_duplicates() {
        let mut rng = StdRng::seed_from_u64(11);
        let input = vec!["True", "True", "False"];
        let shuffled = shuffle_options(&input, &mut rng);
        assert_eq!(shuffled.iter().filter(|s| **s == "True").count(), 2);
        assert_eq!(shuffled.iter().filter(|s| **s == "False").count(), 1);
    }

    #[test]
    fn test_shuffle_does_not_touch_source() {
        let mut rng = StdRng::seed_from_u64(3);
        let input = vec![1, 2, 3, 4];
        let _ = shuffle_options(&input, &mut rng);
        assert_eq!(input, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_shuffle_degenerate_inputs() {
        let mut rng = StdRng::seed_from_u64(0);
        let empty: Vec<String> = Vec::new();
        assert!(shuffle_options(&empty, &mut rng).is_empty());
        assert_eq!(shuffle_options(&["only"], &mut rng), vec!["only"]);
    }

    #[test]
    fn test_shuffle_positions_are_roughly_uniform() {
        // 4 options, 40_000 trials: each (element, position) cell expects 10_000.
        const TRIALS: usize = 40_000;
        const N: usize = 4;
        let mut rng = StdRng::seed_from_u64(2024);
        let input: Vec<usize> = (0..N).collect();
        let mut counts = [[0usize; N]; N];

        for _ in 0..TRIALS {
            let shuffled = shuffle_options(&input, &mut rng);
            for (position, value) in shuffled.iter().enumerate() {
                counts[*value][position] += 1;
            }
        }

        let expected = TRIALS / N;
        for (value, row) in counts.iter().enumerate() {
            for (position, &count) in row.iter().enumerate() {
                let deviation = count.abs_diff(expected);
                assert!(
                    deviation < expected / 10,
                    "element {} landed at position {} {} times (expected ~{})",
                    value,
                    position,
                    count,
                    expected
                );
            }
        }
    }

    #[test]
    fn test_decode_named_and_numeric_entities() {
        assert_eq!(
            decode_html_entities("Who wrote &quot;Hamlet&quot;?"),
            "Who wrote \"Hamlet\"?"
        );
        assert_eq!(decode_html_entities("It&#039;s"), "It's");
        assert_eq!(decode_html_entities("It&#x27;s"), "It's");
        assert_eq!(decode_html_entities("Pok&eacute;mon"), "Pokémon");
        assert_eq!(decode_html_entities("Tom &amp; Jerry"), "Tom & Jerry");
    }

    #[test]
    fn test_decode_accented_and_greek_entities() {
        assert_eq!(decode_html_entities("na&iuml;ve"), "naïve");
        assert_eq!(decode_html_entities("S&atilde;o Paulo"), "São Paulo");
        assert_eq!(decode_html_entities("&Epsilon;psilon"), "Εpsilon");
        assert_eq!(decode_html_entities("perch&ograve;"), "perchò");
        assert_eq!(decode_html_entities("&lrm;Hello"), "\u{200e}Hello");
    }

    #[test]
    fn test_decode_leaves_unknown_sequences() {
        assert_eq!(decode_html_entities("AT&T"), "AT&T");
        assert_eq!(decode_html_entities("a & b"), "a & b");
        assert_eq!(decode_html_entities("&bogus; &"), "&bogus; &");
        assert_eq!(decode_html_entities("plain text"), "plain text");
    }
}

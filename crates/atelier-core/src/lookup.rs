use crate::model::ArtTool;

/// Minimum number of leading name tokens that must appear in an utterance
/// for a product mention to count (shorter names must appear in full).
const MIN_MENTION_TOKENS: usize = 3;

/// Canonical form for name matching: lowercased, diacritics folded,
/// punctuation stripped, whitespace collapsed. Two names normalize equal
/// iff they are equal ignoring case, accents, and punctuation/whitespace.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .chars()
        .flat_map(|c| c.to_lowercase())
        .map(fold_diacritic)
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Map accented Latin letters (Western European plus the Vietnamese
/// precomposed set) to their base letter. Input is already lowercased.
fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'ả' | 'ã' | 'ạ' | 'ă' | 'ằ' | 'ắ' | 'ẳ' | 'ẵ' | 'ặ' | 'â' | 'ầ'
        | 'ấ' | 'ẩ' | 'ẫ' | 'ậ' | 'ä' | 'å' => 'a',
        'è' | 'é' | 'ẻ' | 'ẽ' | 'ẹ' | 'ê' | 'ề' | 'ế' | 'ể' | 'ễ' | 'ệ' | 'ë' => 'e',
        'ì' | 'í' | 'ỉ' | 'ĩ' | 'ị' | 'î' | 'ï' => 'i',
        'ò' | 'ó' | 'ỏ' | 'õ' | 'ọ' | 'ô' | 'ồ' | 'ố' | 'ổ' | 'ỗ' | 'ộ' | 'ơ' | 'ờ'
        | 'ớ' | 'ở' | 'ỡ' | 'ợ' | 'ö' | 'ø' => 'o',
        'ù' | 'ú' | 'ủ' | 'ũ' | 'ụ' | 'ư' | 'ừ' | 'ứ' | 'ử' | 'ữ' | 'ự' | 'û' | 'ü' => 'u',
        'ỳ' | 'ý' | 'ỷ' | 'ỹ' | 'ỵ' | 'ÿ' => 'y',
        'đ' => 'd',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}

/// Resolve a free-text mention to a catalog product.
///
/// A product matches when the normalized utterance contains its full
/// normalized name, or a leading-token prefix of it no shorter than
/// [`MIN_MENTION_TOKENS`]; catalog names carry trailing variant noise
/// ("set of 10 colors (basic)") that users never say. Tie-break is first
/// match in catalog iteration order, not longest match.
pub fn find_mention<'a>(utterance: &str, catalog: &'a [ArtTool]) -> Option<&'a ArtTool> {
    let haystack = normalize(utterance);
    if haystack.is_empty() {
        return None;
    }

    catalog.iter().find(|tool| {
        let name = normalize(&tool.art_name);
        if name.is_empty() {
            return false;
        }
        let matched = name_prefixes(&name).any(|prefix| contains_token_phrase(&haystack, prefix));
        matched
    })
}

/// Yield the full name followed by successively shorter leading-token
/// prefixes, stopping at `MIN_MENTION_TOKENS` tokens.
fn name_prefixes(name: &str) -> impl Iterator<Item = &str> {
    let token_count = name.split(' ').count();
    let min = MIN_MENTION_TOKENS.min(token_count);
    (min..=token_count).rev().map(move |n| {
        match name.match_indices(' ').nth(n - 1) {
            Some((idx, _)) => &name[..idx],
            None => name,
        }
    })
}

/// Substring match aligned to token boundaries, so "pen" never matches
/// inside "pens".
fn contains_token_phrase(haystack: &str, phrase: &str) -> bool {
    haystack.match_indices(phrase).any(|(start, _)| {
        let end = start + phrase.len();
        let ok_before = start == 0 || haystack.as_bytes()[start - 1] == b' ';
        let ok_after = end == haystack.len() || haystack.as_bytes()[end] == b' ';
        ok_before && ok_after
    })
}

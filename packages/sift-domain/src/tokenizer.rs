use std::{collections::HashSet, sync::LazyLock};

static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
	[
		"a", "about", "above", "across", "after", "afterwards", "again", "against", "all",
		"almost", "alone", "along", "already", "also", "although", "always", "am", "among",
		"amongst", "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone",
		"anything", "anyway", "anywhere", "are", "around", "as", "at", "back", "be", "became",
		"because", "become", "becomes", "becoming", "been", "before", "beforehand", "behind",
		"being", "below", "beside", "besides", "between", "beyond", "bill", "both", "bottom",
		"but", "by", "call", "can", "cannot", "cant", "co", "con", "could", "couldnt", "cry",
		"de", "describe", "detail", "do", "done", "down", "due", "during", "each", "eg",
		"eight", "either", "eleven", "else", "elsewhere", "empty", "enough", "etc", "even",
		"ever", "every", "everyone", "everything", "everywhere", "except", "few", "fifteen",
		"fifty", "fill", "find", "fire", "first", "five", "for", "former", "formerly", "forty",
		"found", "four", "from", "front", "full", "further", "get", "give", "go", "had", "has",
		"hasnt", "have", "he", "hence", "her", "here", "hereafter", "hereby", "herein",
		"hereupon", "hers", "herself", "him", "himself", "his", "how", "however", "hundred",
		"i", "ie", "if", "in", "inc", "indeed", "interest", "into", "is", "it", "its", "itself",
		"keep", "last", "latter", "latterly", "least", "less", "ltd", "made", "many", "may",
		"me", "meanwhile", "might", "mill", "mine", "more", "moreover", "most", "mostly",
		"move", "much", "must", "my", "myself", "name", "namely", "neither", "never",
		"nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor", "not",
		"nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto",
		"or", "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own",
		"part", "per", "perhaps", "please", "put", "rather", "re", "same", "see", "seem",
		"seemed", "seeming", "seems", "serious", "several", "she", "should", "show", "side",
		"since", "sincere", "six", "sixty", "so", "some", "somehow", "someone", "something",
		"sometime", "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than",
		"that", "the", "their", "them", "themselves", "then", "thence", "there", "thereafter",
		"thereby", "therefore", "therein", "thereupon", "these", "they", "thick", "thin",
		"third", "this", "those", "though", "three", "through", "throughout", "thru", "thus",
		"to", "together", "too", "top", "toward", "towards", "twelve", "twenty", "two", "un",
		"under", "until", "up", "upon", "us", "very", "via", "was", "we", "well", "were",
		"what", "whatever", "when", "whence", "whenever", "where", "whereafter", "whereas",
		"whereby", "wherein", "whereupon", "wherever", "whether", "which", "while", "whither",
		"who", "whoever", "whole", "whom", "whose", "why", "will", "with", "within", "without",
		"would", "yet", "you", "your", "yours", "yourself", "yourselves",
	]
	.into_iter()
	.collect()
});

pub fn is_stop_word(term: &str) -> bool {
	STOP_WORDS.contains(term)
}

/// Lower-cases, splits on whitespace, trims ASCII punctuation from both ends of every token and
/// drops empty tokens and stop words. No stemming is applied.
pub fn tokenize(text: &str) -> Vec<String> {
	let lowered = text.to_lowercase();
	let mut out = Vec::new();

	for raw in lowered.split_whitespace() {
		let token = raw.trim_matches(|ch: char| ch.is_ascii_punctuation());

		if token.is_empty() || is_stop_word(token) {
			continue;
		}

		out.push(token.to_string());
	}

	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn strips_punctuation_and_stop_words() {
		let tokens = tokenize("The Quarterly budget-review, (meeting)!");

		assert_eq!(tokens, vec!["quarterly", "budget-review", "meeting"]);
	}

	#[test]
	fn keeps_inner_punctuation() {
		assert_eq!(tokenize("e-mail: don't"), vec!["e-mail", "don't"]);
	}

	#[test]
	fn empty_and_stop_word_only_text_yields_nothing() {
		assert!(tokenize("").is_empty());
		assert!(tokenize("  ... !!  ").is_empty());
		assert!(tokenize("The a AN of").is_empty());
	}

	#[test]
	fn second_pass_is_a_fixed_point() {
		let first = tokenize("project update the meeting notes for friday");
		let second = tokenize(&first.join(" "));

		assert_eq!(first, vec!["project", "update", "meeting", "notes", "friday"]);
		assert_eq!(first, second);
	}

	#[test]
	fn splits_on_any_whitespace() {
		assert_eq!(tokenize("lunch\tmenu\nfriday"), vec!["lunch", "menu", "friday"]);
	}
}

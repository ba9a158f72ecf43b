/// Entrepreneurship and regulatory keywords in Latin Uzbek, Cyrillic Uzbek and Russian.
const ENTREPRENEURSHIP_KEYWORDS: &[&str] = &[
    "tadbirkor",
    "tadbirkorlik",
    "biznes",
    "kichik biznes",
    "xususiy",
    "soliq",
    "imtiyoz",
    "yengillik",
    "subsid",
    "subsidiya",
    "grant",
    "kredit",
    "mikrokredit",
    "litsenziya",
    "ruxsatnoma",
    "eksport",
    "import",
    "invest",
    "investitsiya",
    "yatt",
    "mchj",
    "tekshiruv",
    "nazorat",
    "jarima",
    // Cyrillic Uzbek
    "тадбиркор",
    "тадбиркорлик",
    "бизнес",
    "кичик бизнес",
    "хусусий",
    "солиқ",
    "имтиёз",
    "енгиллик",
    "субсид",
    "субсидия",
    "грант",
    "кредит",
    "микрокредит",
    "лицензия",
    "рухсатнома",
    "экспорт",
    "импорт",
    "инвест",
    "инвестиция",
    "ятт",
    "мчж",
    "текширув",
    "назорат",
    "жарима",
    // Russian
    "предприниматель",
    "предпринимательство",
    "льгота",
    "льготы",
    "налог",
    "субсидии",
    "разрешение",
    "инвестиции",
];

/// Case-folded substring membership test over a fixed keyword set.
#[derive(Debug, Clone)]
pub struct TopicClassifier {
    keywords: Vec<String>,
}

impl TopicClassifier {
    pub fn entrepreneurship() -> Self {
        Self::with_keywords(ENTREPRENEURSHIP_KEYWORDS.iter().copied())
    }

    pub fn with_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut folded: Vec<String> = keywords
            .into_iter()
            .map(|keyword| keyword.as_ref().trim().to_lowercase())
            .filter(|keyword| !keyword.is_empty())
            .collect();
        folded.sort();
        folded.dedup();
        Self { keywords: folded }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// True when the text contains at least one keyword. Not word-bounded.
    pub fn matches(&self, text: &str) -> bool {
        let haystack = text.to_lowercase();
        self.keywords
            .iter()
            .any(|keyword| haystack.contains(keyword.as_str()))
    }

    /// Free-text query filter applied on top of the topic match. A blank query matches.
    pub fn matches_query(text: &str, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        needle.is_empty() || text.to_lowercase().contains(&needle)
    }
}

impl Default for TopicClassifier {
    fn default() -> Self {
        Self::entrepreneurship()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_each_script() {
        let classifier = TopicClassifier::entrepreneurship();
        assert!(classifier.matches("Yangi SOLIQ imtiyozlari e'lon qilindi"));
        assert!(classifier.matches("Кичик бизнес учун янги тартиб"));
        assert!(classifier.matches("ЛЬГОТЫ для предпринимателей"));
    }

    #[test]
    fn matches_substrings_without_word_boundaries() {
        let classifier = TopicClassifier::entrepreneurship();
        assert!(classifier.matches("Subsidiyalar ro'yxati"));
        assert!(classifier.matches("reimported goods"));
    }

    #[test]
    fn rejects_unrelated_text() {
        let classifier = TopicClassifier::entrepreneurship();
        assert!(!classifier.matches("Ob-havo ma'lumoti: ertaga yomg'ir"));
        assert!(!classifier.matches(""));
    }

    #[test]
    fn custom_keywords_are_folded_and_deduplicated() {
        let classifier = TopicClassifier::with_keywords(["Grant", "grant", "  ", "ЭКСПОРТ"]);
        assert_eq!(classifier.keywords(), ["grant", "экспорт"]);
        assert!(classifier.matches("экспорт квоталари"));
    }

    #[test]
    fn is_deterministic() {
        let classifier = TopicClassifier::entrepreneurship();
        let text = "MCHJ ro'yxatdan o'tkazish";
        assert_eq!(classifier.matches(text), classifier.matches(text));
    }

    #[test]
    fn query_filter_is_case_insensitive() {
        assert!(TopicClassifier::matches_query("Soliq Kodeksi", "kodeks"));
        assert!(TopicClassifier::matches_query("anything", "  "));
        assert!(!TopicClassifier::matches_query("Soliq", "kredit"));
    }
}

/// общий вторичный вес в обработанном CE
const LEVEL2_BASE: u32 = 0x0000_0005;
/// общий третичный вес в младших 32 битах обработанного CE
const LEVEL3_BASE: u32 = 0x0005_0000;

/// правило сравнения CE образца и текста
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ElementComparison
{
    /// точное совпадение CE
    #[default]
    Standard,
    /// общий вторичный / третичный вес образца совпадает с любым весом текста
    PatternBaseWeightIsWildcard,
    /// общий вес на любой из сторон совпадает с любым весом другой стороны
    AnyBaseWeightIsWildcard,
}

/// результат сравнения пары CE
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CeMatch
{
    Match,
    NoMatch,
    /// CE текста пропускается, CE образца сравнивается со следующим CE текста
    SkipTarget,
    /// CE образца пропускается
    SkipPattern,
}

/// сравнение обработанных CE текста и образца
///
/// на каждом уровне пропуск CE текста проверяется раньше пропуска CE образца
pub fn compare_ce64s(target: u64, pattern: u64, comparison: ElementComparison) -> CeMatch
{
    if target == pattern {
        return CeMatch::Match;
    }

    if comparison == ElementComparison::Standard {
        return CeMatch::NoMatch;
    }

    let any_wildcard = comparison == ElementComparison::AnyBaseWeightIsWildcard;

    let target_high = (target >> 32) as u32;
    let pattern_high = (pattern >> 32) as u32;

    let target_primary = target_high & 0xFFFF_0000;
    let pattern_primary = pattern_high & 0xFFFF_0000;

    if target_primary != pattern_primary {
        if target_primary == 0 {
            return CeMatch::SkipTarget;
        }

        if pattern_primary == 0 && any_wildcard {
            return CeMatch::SkipPattern;
        }

        return CeMatch::NoMatch;
    }

    let target_secondary = target_high & 0xFFFF;
    let pattern_secondary = pattern_high & 0xFFFF;

    if target_secondary != pattern_secondary {
        if target_secondary == 0 {
            return CeMatch::SkipTarget;
        }

        if pattern_secondary == 0 && any_wildcard {
            return CeMatch::SkipPattern;
        }

        return match pattern_secondary == LEVEL2_BASE
            || (any_wildcard && target_secondary == LEVEL2_BASE)
        {
            true => CeMatch::Match,
            false => CeMatch::NoMatch,
        };
    }

    let target_tertiary = target as u32 & 0xFFFF_0000;
    let pattern_tertiary = pattern as u32 & 0xFFFF_0000;

    if target_tertiary != pattern_tertiary {
        return match pattern_tertiary == LEVEL3_BASE
            || (any_wildcard && target_tertiary == LEVEL3_BASE)
        {
            true => CeMatch::Match,
            false => CeMatch::NoMatch,
        };
    }

    CeMatch::Match
}

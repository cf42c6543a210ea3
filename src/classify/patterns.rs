// Heuristic pattern families.
//
// Each family is a named, independently testable collection of compiled
// patterns evaluated against normalized (lowercased) text. Families are
// compiled once when the classifier is built and never touched again.

use anyhow::{Context, Result};
use regex_lite::Regex;

/// A named battery of patterns. Matching asks whether any pattern fires.
pub struct PatternFamily {
    name: &'static str,
    patterns: Vec<Regex>,
}

impl PatternFamily {
    fn compile(name: &'static str, exprs: &[&str]) -> Result<Self> {
        let patterns = exprs
            .iter()
            .map(|e| Regex::new(e).with_context(|| format!("invalid {name} pattern: {e}")))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { name, patterns })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(text))
    }
}

/// All heuristic families used by the classifier.
pub struct HeuristicFamilies {
    pub portfolio: PatternFamily,
    pub tech: PatternFamily,
    pub doxxing: PatternFamily,
    pub explicit_body: PatternFamily,
    pub harassment: PatternFamily,
    pub self_harm: PatternFamily,
    pub personal_sensitive: PatternFamily,
    ssn: Regex,
}

/// Literal CJK nouns checked by containment for portfolio intent, since
/// word-boundary patterns do not apply to CJK text.
pub const PORTFOLIO_CJK_TOKENS: &[&str] = &[
    "履歴書", "経歴", "職歴", "学歴", "スキル", "プロジェクト", "採用", "求人",
    "簡歴", "简历", "工作经验", "学校", "项目", "技能", "雇主", "招聘",
];

const PORTFOLIO: &[&str] = &[
    r"\b(resume|cv|portfolio|employer|employment|job|jobs|career|careers|intern|internship)\b",
    r"\b(school|university|college|degree|education|graduate|graduated|major|alumni)\b",
    r"\b(project|projects|experience|skills?|certifications?|qualifications?|achievements?)\b",
    r"\b(timezone|time zone|location|availability|available|hire|hiring|recruit|recruiter|relocate|relocation)\b",
    r"\bwork(s|ed|ing)?\b",
    r"\b(attend|attended|study|studied|studies)\b",
    r"(経歴|職歴|学歴|履歴書|仕事|会社|学校|大学|専攻)",
    r"(工作|学校|大学|专业|经验|技能|职业|公司)",
];

const TECH: &[&str] = &[
    r"\b(javascript|typescript|python|rust|golang|java|kotlin|swift|ruby|php|scala|haskell)\b",
    r"\bc\+\+",
    r"\b(react|vue|svelte|angular|node|nextjs|next js|django|flask|rails|spring|tailwind)\b",
    r"\b(docker|kubernetes|terraform|aws|azure|gcp|cloud|devops|linux|server)\b",
    r"\b(api|apis|sdk|database|databases|sql|nosql|frontend|backend|fullstack|full stack)\b",
    r"\b(developer|engineer|engineering|software|programming|programmer|coding|code|coded|debug|debugger|debugging)\b",
    r"\b(ai|ml|llm|llms|machine learning|neural|chatbot|model)\b",
    r"\b(framework|frameworks|library|libraries|git|github|open source|repo|repository)\b",
    r"\b(website|web app|webapp|app|application|deploy|deployment|build|built)\b",
    r"(エンジニア|開発|プログラミング|技術|実装)",
    r"(工程师|开发|编程|技术|代码)",
];

const DOXXING: &[&str] = &[
    r"\b(home|house|residential|street|mailing) address\b",
    r"\bwhere (do|does|did) \w+ live\b",
    r"\b(social security|ssn|passport number|driver'?s licen[cs]e|national id|government id)\b",
    r"\b(bank account|routing number|credit card|debit card|card number|iban)\b",
    r"\b(password|passwords|passphrase|api key|secret key|private key|credentials?|access token)\b",
    r"(自宅住所|自宅の住所|住所を教え|どこに住んで|マイナンバー|口座番号|暗証番号|クレジットカード番号|パスワード|秘密鍵)",
    r"(家庭住址|住址|住在哪|身份证|银行账户|银行卡号|信用卡号|密码|私钥)",
];

const EXPLICIT_BODY: &[&str] = &[
    r"(おっぱい|ちんこ|ちんぽ|まんこ|きんたま|陰茎|乳首|勃起)",
    r"(阴茎|阴道|乳头|鸡巴|奶子|肉棒)",
];

const HARASSMENT: &[&str] = &[
    r"\b(shut up|shut the hell up|shut your mouth|go away|get lost|get out of here)\b",
    r"\b(idiot|idiots|stupid|dumb|moron|imbecile|loser|losers|pathetic|worthless|useless|clown)\b",
    r"\b(nobody (likes|cares about) you|you suck|you are trash|you're trash)\b",
    r"\b(troll|trolls|trolling|skill issue)\b",
    r"(黙れ|だまれ|消えろ|うるさい|うざい|ばか|バカ|馬鹿|あほ|アホ|くたばれ)",
    r"(闭嘴|滚开|滚蛋|白痴|蠢货|废物|傻子)",
];

const SELF_HARM: &[&str] = &[
    r"\bkill (myself|me)\b",
    r"\bkms\b",
    r"\b(end|take|ending|taking) my( own)? life\b",
    r"\b(want|wants|wanted) to die\b",
    r"\bsuicid(e|al)\b",
    r"\bself[- ]?harm\b",
    r"\b(hurt|hurting|cut|cutting|harm|harming) myself\b",
    r"(死にたい|自殺|消えたい|リストカット)",
    r"(自杀|想死|轻生|自残)",
];

/// Reserved extension point for personal-sensitive-topic detection. The
/// family is intentionally empty; the portfolio-intent gate that governs it
/// is preserved for future population.
const PERSONAL_SENSITIVE: &[&str] = &[];

impl HeuristicFamilies {
    pub fn compile() -> Result<Self> {
        Ok(Self {
            portfolio: PatternFamily::compile("portfolio", PORTFOLIO)?,
            tech: PatternFamily::compile("tech", TECH)?,
            doxxing: PatternFamily::compile("doxxing", DOXXING)?,
            explicit_body: PatternFamily::compile("explicit_body", EXPLICIT_BODY)?,
            harassment: PatternFamily::compile("harassment", HARASSMENT)?,
            self_harm: PatternFamily::compile("self_harm", SELF_HARM)?,
            personal_sensitive: PatternFamily::compile("personal_sensitive", PERSONAL_SENSITIVE)?,
            ssn: Regex::new(r"\b(\d{3})[- ]?(\d{2})[- ]?(\d{4})\b")
                .context("invalid ssn pattern")?,
        })
    }

    /// SSN-shaped digit sequences, with obviously-invalid area numbers (000,
    /// 666, 900+) rejected in code since the regex engine has no lookaround.
    pub fn ssn_like(&self, text: &str) -> bool {
        for caps in self.ssn.captures_iter(text) {
            let area = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            if area == "000" || area == "666" || area >= "900" {
                continue;
            }
            return true;
        }
        false
    }
}

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One multiple-choice aptitude question. `answer` is always one of `options`
/// once it has passed boundary validation in `remote::wire`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub category: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Example {
    #[serde(default)]
    pub input: Value,
    #[serde(default)]
    pub output: Value,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CodingProblem {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub examples: Vec<Example>,
    /// Expected data structure for the logic gate, when the service provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ds: Option<String>,
    /// Expected time complexity for the logic gate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tc: Option<String>,
}

impl CodingProblem {
    pub fn gate_pair(&self) -> Option<(&str, &str)> {
        match (&self.ds, &self.tc) {
            (Some(ds), Some(tc)) => Some((ds.as_str(), tc.as_str())),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaseResult {
    pub passed: bool,
    #[serde(default)]
    pub expected: Value,
    #[serde(default)]
    pub actual: Value,
}

/// Normalized execution response: results are always an ordered sequence,
/// one per submitted example.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExecutionReport {
    pub results: Vec<CaseResult>,
    pub compile_error: Option<String>,
}

impl ExecutionReport {
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "python3")]
    Python3,
    #[serde(rename = "java")]
    Java,
    #[serde(rename = "cpp")]
    Cpp,
}

pub const LANGUAGES: &[Language] = &[Language::Python3, Language::Java, Language::Cpp];

impl Language {
    pub fn key(self) -> &'static str {
        match self {
            Language::Python3 => "python3",
            Language::Java => "java",
            Language::Cpp => "cpp",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Language::Python3 => "Python 3",
            Language::Java => "Java 17",
            Language::Cpp => "C++ 20",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        LANGUAGES.iter().copied().find(|l| l.key() == key)
    }

    pub fn starter(self) -> &'static str {
        match self {
            Language::Python3 => "def solve(input_data):\n    # Write your logic here\n    return 0",
            Language::Java => concat!(
                "import java.util.*;\n\n",
                "public class Solution {\n",
                "    public static void main(String[] args) {\n",
                "        Scanner sc = new Scanner(System.in);\n",
                "        while(sc.hasNextLine()) {\n",
                "            System.out.println(sc.nextLine());\n",
                "        }\n",
                "    }\n",
                "}"
            ),
            Language::Cpp => concat!(
                "#include <iostream>\n",
                "#include <string>\n",
                "using namespace std;\n\n",
                "int main() {\n",
                "    string s;\n",
                "    while(getline(cin, s)) {\n",
                "        cout << s << endl;\n",
                "    }\n",
                "    return 0;\n",
                "}"
            ),
        }
    }

    pub fn next(self) -> Self {
        let idx = LANGUAGES.iter().position(|&l| l == self).unwrap_or(0);
        LANGUAGES[(idx + 1) % LANGUAGES.len()]
    }
}

/// Body of `POST /execute-code`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExecutionRequest {
    pub code: String,
    pub language: Language,
    pub test_cases: Vec<Example>,
}

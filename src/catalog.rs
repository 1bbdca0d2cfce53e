/// Companies offered in the aptitude picker. `name` is the key sent to the
/// question service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Company {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
}

pub const COMPANIES: &[Company] = &[
    Company { id: "zoho", name: "ZOHO", category: "LOGIC" },
    Company { id: "deloitte", name: "DELOITTE", category: "STRATEGY" },
    Company { id: "tcs", name: "TCS", category: "FOUNDATION" },
    Company { id: "google", name: "GOOGLE", category: "ALGO" },
    Company { id: "amazon", name: "AMAZON", category: "SCALE" },
    Company { id: "wipro", name: "WIPRO", category: "FOUNDATION" },
    Company { id: "accenture", name: "ACCENTURE", category: "STRATEGY" },
    Company { id: "infosys", name: "INFOSYS", category: "LOGIC" },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Topic {
    pub name: &'static str,
    pub unlocked: bool,
    /// Advertised set size; the service decides the real count.
    pub problems: usize,
    pub difficulty: &'static str,
}

pub const TOPICS: &[Topic] = &[
    Topic { name: "Arrays & Hashing", unlocked: true, problems: 12, difficulty: "Foundation" },
    Topic { name: "Two Pointers", unlocked: true, problems: 8, difficulty: "Basic" },
    Topic { name: "Sliding Window", unlocked: false, problems: 5, difficulty: "Medium" },
    Topic { name: "Trees & Graphs", unlocked: false, problems: 20, difficulty: "Advanced" },
];

pub fn find_topic(name: &str) -> Option<&'static Topic> {
    TOPICS.iter().find(|t| t.name == name)
}

/// Skills a user can pick from. Submitted skill lists are validated against this.
pub const AVAILABLE_SKILLS: &[&str] = &[
    "Programming",
    "Data Structures",
    "Legal Research",
    "Negotiation",
    "Financial Analysis",
    "Excel",
    "Python",
    "Machine Learning",
    "Data Analysis",
    "System Design",
    "Problem Solving",
    "SQL",
    "Contract Law",
    "Communication",
    "Compliance",
    "Risk Management",
    "Auditing",
    "Policy Development",
    "Critical Thinking",
    "Financial Reporting",
    "Accounting Principles",
    "Tax",
    "Supply Chain Management",
    "Inventory Management",
    "Project Management",
    "AutoCAD",
    "Structural Analysis",
    "Patient Care",
    "Clinical Skills",
    "Health Assessment",
    "Diagnosis",
    "Technical Drawing",
    "Equipment Maintenance",
    "Welding",
    "Blueprint Reading",
    "Environmental Science",
    "Research Methods",
    "Classroom Management",
    "Curriculum Planning",
    "Child Development",
    "Technical Support",
    "Troubleshooting",
    "Customer Service",
    "Networking",
    "System Administration",
];

/// Returns the submitted skills that are not in the catalog, in input order.
pub fn invalid_skills(skills: &[String]) -> Vec<&str> {
    skills
        .iter()
        .map(String::as_str)
        .filter(|s| !AVAILABLE_SKILLS.contains(s))
        .collect()
}

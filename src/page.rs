//! Fixed structure and copy of the Academics page.

/// In-page anchor targets, used by the scroll navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Top,
    Timetable,
    Courses,
    Curriculum,
    Rules,
    Faq,
}

impl Section {
    pub const NAV: [Section; 5] = [Section::Timetable, Section::Courses, Section::Curriculum, Section::Rules, Section::Faq];

    pub fn id(self) -> &'static str {
        match self {
            Section::Top => "academics-top",
            Section::Timetable => "timetable",
            Section::Courses => "courses",
            Section::Curriculum => "curriculum",
            Section::Rules => "rules",
            Section::Faq => "faq",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Section::Top => "Academics",
            Section::Timetable => "Time Table",
            Section::Courses => "Courses",
            Section::Curriculum => "Curriculum",
            Section::Rules => "Academic Rules",
            Section::Faq => "Frequently Asked Questions",
        }
    }

    /// Shorter label used on the navigation cards.
    pub fn nav_label(self) -> &'static str {
        match self {
            Section::Timetable => "Time Table",
            Section::Rules => "Rules",
            Section::Faq => "FAQs",
            other => other.title(),
        }
    }

    pub fn from_id(id: &str) -> Option<Section> {
        [Section::Top, Section::Timetable, Section::Courses, Section::Curriculum, Section::Rules, Section::Faq]
            .into_iter()
            .find(|s| s.id() == id)
    }
}

pub const TIMETABLE_PDF: &str = "/timetable.pdf";

pub const INTRO: &str =
    "Learn about our academic programs, courses, and resources for computer science and engineering students.";

pub struct Semester {
    pub name: &'static str,
    pub subjects: &'static [&'static str],
}

pub struct Year {
    pub name: &'static str,
    pub summary: &'static str,
    pub semesters: [Semester; 2],
}

pub const CURRICULUM: [Year; 2] = [
    Year {
        name: "First Year",
        summary: "Foundation courses in mathematics, programming, and engineering principles.",
        semesters: [
            Semester {
                name: "Semester 1",
                subjects: &["Calculus and Linear Algebra", "Introduction to Programming", "Digital Logic Design", "Physics for Computing", "Technical Communication"],
            },
            Semester {
                name: "Semester 2",
                subjects: &["Discrete Mathematics", "Data Structures", "Computer Organization", "Probability and Statistics", "Engineering Ethics"],
            },
        ],
    },
    Year {
        name: "Second Year",
        summary: "Core computer science subjects and fundamental theory.",
        semesters: [
            Semester {
                name: "Semester 3",
                subjects: &["Design and Analysis of Algorithms", "Object Oriented Programming", "Computer Architecture", "Formal Languages and Automata", "Economics for Engineers"],
            },
            Semester {
                name: "Semester 4",
                subjects: &["Operating Systems", "Database Management Systems", "Computer Networks", "Software Engineering", "Technical Writing"],
            },
        ],
    },
];

pub struct Faq {
    pub question: &'static str,
    pub answer: &'static str,
}

pub const FAQS: [Faq; 5] = [
    Faq {
        question: "How do I register for courses?",
        answer: "Course registration is done through the online student portal at the beginning of each semester. The registration window is typically open for two weeks, and students must consult with their academic advisor before finalizing their course selection.",
    },
    Faq {
        question: "What is the process for adding/dropping courses?",
        answer: "Students can add or drop courses during the first two weeks of the semester without any penalty. After this period, dropping a course will result in a 'W' (Withdrawal) grade on the transcript. No course changes are permitted after the fourth week.",
    },
    Faq {
        question: "How is the CGPA calculated?",
        answer: "The Cumulative Grade Point Average (CGPA) is calculated by multiplying the grade point value of each course by its credit hours, summing these values, and dividing by the total number of credit hours attempted. The result is rounded to two decimal places.",
    },
    Faq {
        question: "What resources are available for academic support?",
        answer: "The department offers various support resources including faculty office hours, teaching assistants, peer tutoring programs, and the academic learning center. Additionally, the library provides access to study spaces, reference materials, and online resources.",
    },
    Faq {
        question: "What is the minimum CGPA required to avoid academic probation?",
        answer: "Students must maintain a minimum CGPA of 5.0 to remain in good academic standing. Those falling below this threshold will be placed on academic probation and will need to meet with an academic advisor to develop an improvement plan.",
    },
];

pub const ACADEMIC_OFFICE_EMAIL: &str = "academics@cs.iitdh.ac.in";
pub const OFFICE_HOURS: &str = "Monday-Friday, 9:00 AM - 5:00 PM";

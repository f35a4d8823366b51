use crate::seed::{SeedFuture, Seeder};
use db::models::course;
use sea_orm::DatabaseConnection;
use services::ServiceContext;
use services::course_service::{CourseService, CreateCourse};
use services::subject_service::{CreateSubject, SubjectService};

pub struct CourseSeeder;

const CATALOGUE: &[(&str, &str, &[(&str, &str, i32)])] = &[
    (
        "BSCS",
        "Bachelor of Science in Computer Science",
        &[
            ("CS101", "Introduction to Computing", 3),
            ("CS102", "Computer Programming 1", 3),
            ("CS201", "Data Structures and Algorithms", 3),
            ("CS202", "Discrete Structures", 3),
            ("CS301", "Operating Systems", 3),
        ],
    ),
    (
        "BSIT",
        "Bachelor of Science in Information Technology",
        &[
            ("IT101", "IT Fundamentals", 3),
            ("IT102", "Web Systems and Technologies", 3),
            ("IT201", "Networking 1", 3),
            ("IT202", "Information Management", 3),
        ],
    ),
    (
        "BSN",
        "Bachelor of Science in Nursing",
        &[
            ("NCM101", "Theoretical Foundations of Nursing", 3),
            ("NCM102", "Health Assessment", 4),
            ("ANAT101", "Anatomy and Physiology", 5),
        ],
    ),
];

impl Seeder for CourseSeeder {
    fn seed<'a>(&'a self, db: &'a DatabaseConnection, ctx: &'a ServiceContext) -> SeedFuture<'a> {
        Box::pin(async move {
            for (code, name, subjects) in CATALOGUE {
                if course::Model::find_by_code(db, code).await?.is_some() {
                    continue;
                }

                let created = CourseService::create(
                    db,
                    ctx,
                    CreateCourse {
                        code: code.to_string(),
                        name: name.to_string(),
                        description: None,
                    },
                )
                .await?;

                for (subject_code, title, units) in *subjects {
                    SubjectService::create(
                        db,
                        ctx,
                        CreateSubject {
                            course_id: created.id,
                            code: subject_code.to_string(),
                            title: title.to_string(),
                            units: *units,
                        },
                    )
                    .await?;
                }
            }

            Ok(())
        })
    }
}

use std::sync::LazyLock;

use tracing::debug;

use crate::config::DetectionSection;
use crate::types::{DatabaseDetection, FrameworkCategory};

use super::evidence::{CandidatePatterns, CandidateScore, DATABASE_WEIGHTS, EvidenceIndex, score_all};

const NONE: FrameworkCategory = FrameworkCategory::Unknown;

static BUILTIN_DATABASES: LazyLock<Vec<CandidatePatterns>> = LazyLock::new(|| {
    vec![
        CandidatePatterns::new(
            "PostgreSQL",
            NONE,
            &["psycopg2", "pg", "asyncpg", "node-postgres"],
            &[],
            &["postgresql://", "postgres://", "SELECT * FROM", "CREATE TABLE"],
        ),
        CandidatePatterns::new(
            "MongoDB",
            NONE,
            &["pymongo", "mongoose", "mongodb"],
            &[],
            &["mongodb://", "MongoClient", "db.collection", ".insertOne", ".find"],
        ),
        CandidatePatterns::new(
            "MySQL",
            NONE,
            &["mysql-connector", "mysql2", "mysqlclient", "pymysql"],
            &[],
            &["mysql://", "CREATE TABLE", "SELECT * FROM"],
        ),
        CandidatePatterns::new(
            "SQLite",
            NONE,
            &["sqlite3"],
            &[".db", ".sqlite", ".sqlite3"],
            &[".db", "sqlite://"],
        ),
        CandidatePatterns::new(
            "Redis",
            NONE,
            &["redis", "ioredis", "redis-py"],
            &[],
            &["redis://", ".set(", ".get(", "REDIS_"],
        ),
        CandidatePatterns::new(
            "Elasticsearch",
            NONE,
            &["elasticsearch", "@elastic/elasticsearch"],
            &[],
            &["http://localhost:9200", "es.search", ".index("],
        ),
        CandidatePatterns::new(
            "DynamoDB",
            NONE,
            &["boto3", "aws-sdk"],
            &[],
            &["dynamodb", "put_item", "query"],
        ),
        CandidatePatterns::new(
            "Cassandra",
            NONE,
            &["cassandra-driver"],
            &[],
            &["cassandra", "SELECT * FROM", "CREATE KEYSPACE"],
        ),
    ]
});

static BUILTIN_ORMS: LazyLock<Vec<CandidatePatterns>> = LazyLock::new(|| {
    vec![
        CandidatePatterns::new(
            "Prisma",
            NONE,
            &["@prisma/client"],
            &["prisma/schema.prisma", "schema.prisma"],
            &["prisma.client", "prisma.", "model User {"],
        ),
        CandidatePatterns::new(
            "TypeORM",
            NONE,
            &["typeorm"],
            &["ormconfig.json"],
            &["@Entity", "@Column", "createConnection"],
        ),
        CandidatePatterns::new("Sequelize", NONE, &["sequelize"], &[], &["new Sequelize", "sequelize.define"]),
        CandidatePatterns::new(
            "SQLAlchemy",
            NONE,
            &["sqlalchemy", "sqlalchemy.orm"],
            &[],
            &["declarative_base", "Column(", "relationship("],
        ),
        CandidatePatterns::new(
            "Django ORM",
            NONE,
            &["django.db"],
            &["models.py"],
            &["models.Model", "models.CharField", "models.ForeignKey"],
        ),
        CandidatePatterns::new(
            "Mongoose",
            NONE,
            &["mongoose"],
            &[],
            &["mongoose.Schema", "mongoose.model", "new Schema"],
        ),
        CandidatePatterns::new(
            "Drizzle",
            NONE,
            &["drizzle-orm"],
            &["drizzle.config"],
            &["pgTable", "mysqlTable"],
        ),
    ]
});

pub fn builtin_databases() -> &'static [CandidatePatterns] {
    &BUILTIN_DATABASES
}

pub fn builtin_orms() -> &'static [CandidatePatterns] {
    &BUILTIN_ORMS
}

/// Highest strictly-greater score wins, so the first-declared candidate
/// keeps a tie.
fn best(scores: Vec<CandidateScore>) -> Option<CandidateScore> {
    let mut best: Option<CandidateScore> = None;
    for score in scores {
        if best.as_ref().is_none_or(|b| score.score > b.score) {
            best = Some(score);
        }
    }
    best
}

/// Primary database, if its score is above `database_threshold`.
pub fn detect_database(index: &EvidenceIndex, config: &DetectionSection) -> Option<DatabaseDetection> {
    let table = builtin_databases().iter().chain(&config.extra_databases);
    let winner = best(score_all(index, table, DATABASE_WEIGHTS))
        .filter(|s| s.score > config.database_threshold)?;
    debug!(database = %winner.name, confidence = winner.score, "Database detection");
    Some(DatabaseDetection {
        name: winner.name,
        confidence: winner.score,
        evidence: winner.evidence,
    })
}

/// ORM / data-access library name, if its score is above `orm_threshold`.
pub fn detect_orm(index: &EvidenceIndex, config: &DetectionSection) -> Option<String> {
    let table = builtin_orms().iter().chain(&config.extra_orms);
    best(score_all(index, table, DATABASE_WEIGHTS))
        .filter(|s| s.score > config.orm_threshold)
        .map(|s| s.name)
}

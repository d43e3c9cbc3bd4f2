#![allow(dead_code)] // OpenAPI doc stubs are only referenced by utoipa macros.

use crate::{
    handlers::{
        admin::{AdminCourseListQuery, RejectCoursePayload, SetActivePayload},
        auth::{LogoutRequest, RefreshRequest},
        catalog::CatalogQuery,
    },
    models::{
        course::{
            ApprovalStatus, CourseLevel, CourseResponse, CourseState, CreateCourseRequest, Price,
            SubmitCourseRequest, UpdateCourseRequest,
        },
        enrollment::{
            EnrolledCourse, EnrollmentCheckResponse, EnrollmentResponse, EnrollmentStatus,
            EnrollmentType,
        },
        lesson::{CreateLessonRequest, LessonResponse, LessonType},
        section::{CreateSectionRequest, SectionResponse},
        user::{
            AuthResponse, ChangePasswordRequest, SigninRequest, SignupRequest,
            UpdateProfileRequest, UserResponse,
        },
    },
};
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        signup_doc,
        signin_doc,
        refresh_doc,
        logout_doc,
        me_doc,
        update_me_doc,
        change_password_doc,
        create_course_doc,
        my_courses_doc,
        get_course_doc,
        update_course_doc,
        delete_course_doc,
        submit_course_doc,
        create_section_doc,
        list_sections_doc,
        delete_section_doc,
        create_lesson_doc,
        list_lessons_doc,
        delete_lesson_doc,
        enroll_doc,
        check_enrollment_doc,
        my_enrollments_doc,
        catalog_list_doc,
        catalog_detail_doc,
        admin_list_courses_doc,
        admin_approve_course_doc,
        admin_reject_course_doc,
        admin_list_users_doc,
        admin_set_user_active_doc
    ),
    components(
        schemas(
            // auth
            SignupRequest,
            SigninRequest,
            RefreshRequest,
            LogoutRequest,
            ChangePasswordRequest,
            UpdateProfileRequest,
            AuthResponse,
            UserResponse,
            // courses
            CreateCourseRequest,
            UpdateCourseRequest,
            SubmitCourseRequest,
            CourseResponse,
            CourseState,
            ApprovalStatus,
            CourseLevel,
            Price,
            // sections & lessons
            CreateSectionRequest,
            SectionResponse,
            CreateLessonRequest,
            LessonResponse,
            LessonType,
            // enrollments
            EnrollmentResponse,
            EnrollmentCheckResponse,
            EnrolledCourse,
            EnrollmentStatus,
            EnrollmentType,
            // admin
            RejectCoursePayload,
            SetActivePayload
        )
    ),
    modifiers(&SecuritySchemes),
    tags(
        (name = "Auth", description = "Signup, signin, token refresh, profile"),
        (name = "Courses", description = "Course authoring and publication workflow"),
        (name = "Content", description = "Sections and lessons"),
        (name = "Enrollments", description = "Enrollment ledger"),
        (name = "Catalog", description = "Public course discovery"),
        (name = "Admin", description = "Moderation and user administration")
    ),
    security(("BearerAuth" = []))
)]
pub struct ApiDoc;

struct SecuritySchemes;

impl Modify for SecuritySchemes {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();

        let mut bearer = Http::new(HttpAuthScheme::Bearer);
        bearer.bearer_format = Some("JWT".to_string());

        components.add_security_scheme("BearerAuth", SecurityScheme::Http(bearer));
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Account created", body = AuthResponse),
        (status = 409, description = "Email already registered")
    ),
    tag = "Auth",
    security(())
)]
fn signup_doc() {}

#[utoipa::path(
    post,
    path = "/api/auth/signin",
    request_body = SigninRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth",
    security(())
)]
fn signin_doc() {}

#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body = RefreshRequest,
    responses((status = 200, description = "Tokens rotated", body = AuthResponse)),
    tag = "Auth",
    security(())
)]
fn refresh_doc() {}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    request_body = LogoutRequest,
    responses((status = 200, description = "Sessions revoked")),
    tag = "Auth"
)]
fn logout_doc() {}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses((status = 200, description = "Current user", body = UserResponse)),
    tag = "Auth"
)]
fn me_doc() {}

#[utoipa::path(
    put,
    path = "/api/auth/me",
    request_body = UpdateProfileRequest,
    responses((status = 200, description = "Profile updated", body = UserResponse)),
    tag = "Auth"
)]
fn update_me_doc() {}

#[utoipa::path(
    put,
    path = "/api/auth/change-password",
    request_body = ChangePasswordRequest,
    responses((status = 200, description = "Password updated")),
    tag = "Auth"
)]
fn change_password_doc() {}

#[utoipa::path(
    post,
    path = "/api/courses",
    request_body = CreateCourseRequest,
    responses(
        (status = 200, description = "Course created as draft/pending", body = CourseResponse),
        (status = 400, description = "Validation failed")
    ),
    tag = "Courses"
)]
fn create_course_doc() {}

#[utoipa::path(
    get,
    path = "/api/courses/mine",
    responses((status = 200, description = "Caller's courses", body = [CourseResponse])),
    tag = "Courses"
)]
fn my_courses_doc() {}

#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    params(("id" = String, Path, description = "Course id")),
    responses(
        (status = 200, body = CourseResponse),
        (status = 404, description = "Not found or not visible to the caller")
    ),
    tag = "Courses"
)]
fn get_course_doc() {}

#[utoipa::path(
    put,
    path = "/api/courses/{id}",
    params(("id" = String, Path, description = "Course id")),
    request_body = UpdateCourseRequest,
    responses(
        (status = 200, description = "Partial merge applied", body = CourseResponse),
        (status = 403, description = "Caller is not the creator")
    ),
    tag = "Courses"
)]
fn update_course_doc() {}

#[utoipa::path(
    delete,
    path = "/api/courses/{id}",
    params(("id" = String, Path, description = "Course id")),
    responses(
        (status = 200, description = "Course and content tree deleted"),
        (status = 409, description = "Course has enrollments")
    ),
    tag = "Courses"
)]
fn delete_course_doc() {}

#[utoipa::path(
    post,
    path = "/api/courses/{id}/submit",
    params(("id" = String, Path, description = "Course id")),
    request_body = SubmitCourseRequest,
    responses(
        (status = 200, description = "Submitted for approval", body = CourseResponse),
        (status = 400, description = "Resubmission without a description")
    ),
    tag = "Courses"
)]
fn submit_course_doc() {}

#[utoipa::path(
    post,
    path = "/api/courses/{id}/sections",
    params(("id" = String, Path, description = "Course id")),
    request_body = CreateSectionRequest,
    responses(
        (status = 200, body = SectionResponse),
        (status = 409, description = "Position already taken")
    ),
    tag = "Content"
)]
fn create_section_doc() {}

#[utoipa::path(
    get,
    path = "/api/courses/{id}/sections",
    params(("id" = String, Path, description = "Course id")),
    responses((status = 200, description = "Sections in order", body = [SectionResponse])),
    tag = "Content"
)]
fn list_sections_doc() {}

#[utoipa::path(
    delete,
    path = "/api/sections/{id}",
    params(("id" = String, Path, description = "Section id")),
    responses((status = 200, description = "Section and child lessons deleted")),
    tag = "Content"
)]
fn delete_section_doc() {}

#[utoipa::path(
    post,
    path = "/api/courses/{course_id}/sections/{section_id}/lessons",
    params(
        ("course_id" = String, Path, description = "Course id"),
        ("section_id" = String, Path, description = "Section id")
    ),
    request_body = CreateLessonRequest,
    responses(
        (status = 200, body = LessonResponse),
        (status = 400, description = "Section does not belong to the course")
    ),
    tag = "Content"
)]
fn create_lesson_doc() {}

#[utoipa::path(
    get,
    path = "/api/sections/{id}/lessons",
    params(("id" = String, Path, description = "Section id")),
    responses((status = 200, description = "Lessons in order", body = [LessonResponse])),
    tag = "Content"
)]
fn list_lessons_doc() {}

#[utoipa::path(
    delete,
    path = "/api/lessons/{id}",
    params(("id" = String, Path, description = "Lesson id")),
    responses((status = 200, description = "Lesson deleted")),
    tag = "Content"
)]
fn delete_lesson_doc() {}

#[utoipa::path(
    post,
    path = "/api/courses/{id}/enroll",
    params(("id" = String, Path, description = "Course id")),
    responses(
        (status = 200, body = EnrollmentResponse),
        (status = 409, description = "Already enrolled")
    ),
    tag = "Enrollments"
)]
fn enroll_doc() {}

#[utoipa::path(
    get,
    path = "/api/courses/{id}/enrollment",
    params(("id" = String, Path, description = "Course id")),
    responses((status = 200, body = EnrollmentCheckResponse)),
    tag = "Enrollments"
)]
fn check_enrollment_doc() {}

#[utoipa::path(
    get,
    path = "/api/enrollments/me",
    responses((status = 200, description = "Caller's enrollments", body = [EnrolledCourse])),
    tag = "Enrollments"
)]
fn my_enrollments_doc() {}

#[utoipa::path(
    get,
    path = "/api/catalog/courses",
    params(CatalogQuery),
    responses((status = 200, description = "Approved, published courses")),
    tag = "Catalog",
    security(())
)]
fn catalog_list_doc() {}

#[utoipa::path(
    get,
    path = "/api/catalog/courses/{id}",
    params(("id" = String, Path, description = "Course id")),
    responses(
        (status = 200, body = CourseResponse),
        (status = 404, description = "Not publicly visible")
    ),
    tag = "Catalog",
    security(())
)]
fn catalog_detail_doc() {}

#[utoipa::path(
    get,
    path = "/api/admin/courses",
    params(AdminCourseListQuery),
    responses((status = 200, description = "All courses, filterable")),
    tag = "Admin"
)]
fn admin_list_courses_doc() {}

#[utoipa::path(
    put,
    path = "/api/admin/courses/{id}/approve",
    params(("id" = String, Path, description = "Course id")),
    responses((status = 200, description = "Course approved and published", body = CourseResponse)),
    tag = "Admin"
)]
fn admin_approve_course_doc() {}

#[utoipa::path(
    put,
    path = "/api/admin/courses/{id}/reject",
    params(("id" = String, Path, description = "Course id")),
    request_body = RejectCoursePayload,
    responses(
        (status = 200, description = "Course rejected", body = CourseResponse),
        (status = 400, description = "Blank reason")
    ),
    tag = "Admin"
)]
fn admin_reject_course_doc() {}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    responses((status = 200, description = "Paginated user listing")),
    tag = "Admin"
)]
fn admin_list_users_doc() {}

#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/active",
    params(("id" = String, Path, description = "User id")),
    request_body = SetActivePayload,
    responses((status = 200, description = "Active flag updated")),
    tag = "Admin"
)]
fn admin_set_user_active_doc() {}

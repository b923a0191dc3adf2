//! # ユーザーユースケース
//!
//! ユースケース DTO とドメインエンティティの相互変換、および
//! リポジトリへの委譲を行う。変換は常に成功し、重なり合うフィールドを
//! すべて保存する。

use async_trait::async_trait;
use meibo_domain::{
    AppError,
    user::{NewUser, User, UserId},
};
use meibo_infra::{RequestTx, repository::UserRepository};

/// ユースケース層のユーザー DTO
///
/// 保存済みのユーザーを表す。識別子とタイムスタンプのうち、
/// トランスポートへ渡すのは識別子だけである。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDto {
    pub id:         UserId,
    pub first_name: String,
    pub last_name:  String,
    pub age:        i32,
}

impl UserDto {
    /// ドメインエンティティから DTO へ変換する
    pub fn from_entity(entity: &User) -> Self {
        Self {
            id:         entity.id().clone(),
            first_name: entity.first_name().to_string(),
            last_name:  entity.last_name().to_string(),
            age:        entity.age(),
        }
    }
}

/// 作成リクエストのユースケース DTO
///
/// 識別子は含まない。採番は永続化時に一度だけ行われる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserDto {
    pub first_name: String,
    pub last_name:  String,
    pub age:        i32,
}

impl NewUserDto {
    /// 保存前のドメインエンティティへ変換する
    pub fn into_entity(self) -> NewUser {
        NewUser {
            first_name: self.first_name,
            last_name:  self.last_name,
            age:        self.age,
        }
    }
}

/// ユーザーユースケースのポート
///
/// トランスポートハンドラはこのトレイトだけに依存する。
#[async_trait]
pub trait UserUseCase: Send + Sync {
    /// ユーザーを作成する
    async fn add_user(&self, tx: &RequestTx, input: NewUserDto) -> Result<UserDto, AppError>;

    /// ユーザーを検索する
    async fn find_user(&self, tx: &RequestTx, id: &UserId) -> Result<UserDto, AppError>;
}

/// ユーザーユースケース実装
///
/// リポジトリのポートをコンストラクタで注入する。
pub struct UserUseCaseImpl<R> {
    user_repository: R,
}

impl<R> UserUseCaseImpl<R> {
    pub fn new(user_repository: R) -> Self {
        Self { user_repository }
    }
}

#[async_trait]
impl<R: UserRepository> UserUseCase for UserUseCaseImpl<R> {
    async fn add_user(&self, tx: &RequestTx, input: NewUserDto) -> Result<UserDto, AppError> {
        let entity = self
            .user_repository
            .save(tx, input.into_entity())
            .await?;
        Ok(UserDto::from_entity(&entity))
    }

    async fn find_user(&self, tx: &RequestTx, id: &UserId) -> Result<UserDto, AppError> {
        let entity = self.user_repository.find(tx, id).await?;
        Ok(UserDto::from_entity(&entity))
    }
}

#[cfg(test)]
mod tests {
    use meibo_infra::mock::MockUserRepository;
    use pretty_assertions::assert_eq;

    use super::*;

    /// 常に失敗するスタブリポジトリ
    struct FailingUserRepository {
        error: AppError,
    }

    #[async_trait]
    impl UserRepository for FailingUserRepository {
        async fn save(&self, _tx: &RequestTx, _user: NewUser) -> Result<User, AppError> {
            Err(self.error.clone())
        }

        async fn find(&self, _tx: &RequestTx, _id: &UserId) -> Result<User, AppError> {
            Err(self.error.clone())
        }
    }

    fn new_user_dto() -> NewUserDto {
        NewUserDto {
            first_name: "Taro".to_string(),
            last_name:  "Yamada".to_string(),
            age:        30,
        }
    }

    #[tokio::test]
    async fn test_add_userは採番済みの識別子を返す() {
        let sut = UserUseCaseImpl::new(MockUserRepository::new());
        let tx = RequestTx::mock();

        let dto = sut.add_user(&tx, new_user_dto()).await.unwrap();

        assert_eq!(dto.first_name, "Taro");
        assert_eq!(dto.last_name, "Yamada");
        assert_eq!(dto.age, 30);
        assert!(!dto.id.to_string().is_empty());
    }

    #[tokio::test]
    async fn test_同じ入力でも識別子は毎回異なる() {
        let sut = UserUseCaseImpl::new(MockUserRepository::new());
        let tx = RequestTx::mock();

        let first = sut.add_user(&tx, new_user_dto()).await.unwrap();
        let second = sut.add_user(&tx, new_user_dto()).await.unwrap();

        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_find_userは保存したフィールドをそのまま返す() {
        let sut = UserUseCaseImpl::new(MockUserRepository::new());
        let tx = RequestTx::mock();

        let saved = sut.add_user(&tx, new_user_dto()).await.unwrap();
        let found = sut.find_user(&tx, &saved.id).await.unwrap();

        assert_eq!(found, saved);
    }

    #[tokio::test]
    async fn test_リポジトリのエラーは変更されずに伝播する() {
        let error = AppError::duplicate("一意制約に違反しています");
        let sut = UserUseCaseImpl::new(FailingUserRepository {
            error: error.clone(),
        });
        let tx = RequestTx::mock();

        let result = sut.add_user(&tx, new_user_dto()).await;

        assert_eq!(result.unwrap_err(), error);
    }

    #[tokio::test]
    async fn test_not_foundも変更されずに伝播する() {
        let error = AppError::not_found("ユーザーが見つかりません");
        let sut = UserUseCaseImpl::new(FailingUserRepository {
            error: error.clone(),
        });
        let tx = RequestTx::mock();

        let result = sut.find_user(&tx, &UserId::new()).await;

        assert_eq!(result.unwrap_err(), error);
    }

    /// DTO → エンティティ →（インメモリ永続化）→ エンティティ → DTO の
    /// ラウンドトリップでフィールドが保存されること
    #[tokio::test]
    async fn test_ラウンドトリップでフィールドが保存される() {
        let input = new_user_dto();
        let sut = UserUseCaseImpl::new(MockUserRepository::new());
        let tx = RequestTx::mock();

        let output = sut.add_user(&tx, input.clone()).await.unwrap();

        assert_eq!(output.first_name, input.first_name);
        assert_eq!(output.last_name, input.last_name);
        assert_eq!(output.age, input.age);
    }
}

use assert_fs::TempDir;
use mygit::Repository;
use mygit::areas::repository::DEFAULT_METADATA_DIR;
use mygit::artifacts::objects::object_id::ObjectId;
use std::cell::RefCell;
use std::io::Write;
use std::path::PathBuf;
use std::rc::Rc;

/// Writer that keeps everything a command printed for later inspection
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    /// Drain what was written so far
    pub fn take(&self) -> String {
        let bytes = std::mem::take(&mut *self.0.borrow_mut());
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

pub struct TestRepository {
    pub dir: TempDir,
    pub repository: Repository,
    pub output: SharedBuffer,
}

/// An initialized, empty repository in a fresh temporary directory
pub async fn init_repository() -> TestRepository {
    colored::control::set_override(false);

    let dir = TempDir::new().expect("Failed to create temp dir");
    let output = SharedBuffer::default();
    let mut repository = Repository::new(
        dir.path(),
        DEFAULT_METADATA_DIR,
        Box::new(output.clone()),
    )
    .expect("repository context");
    repository.init().await.expect("init to succeed");
    output.take();

    TestRepository {
        dir,
        repository,
        output,
    }
}

impl TestRepository {
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write(&self, name: &str, content: &str) {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("parent directory");
        }
        std::fs::write(path, content).expect("file to be written");
    }

    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.path(name)).expect("file to be readable")
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path(name).exists()
    }

    pub fn remove(&self, name: &str) {
        std::fs::remove_file(self.path(name)).expect("file to be removed");
    }

    pub async fn add_all(&mut self) {
        let summary = self
            .repository
            .add(&[".".to_string()])
            .await
            .expect("add to succeed");
        assert!(summary.errors.is_empty(), "add errors: {:?}", summary.errors);
    }

    /// Stage the whole tree and commit it
    pub async fn commit_all(&mut self, message: &str) -> ObjectId {
        self.add_all().await;
        let oid = self
            .repository
            .commit(message)
            .await
            .expect("commit to succeed");
        self.output.take();

        oid
    }

    /// Write the files, then stage and commit everything
    pub async fn commit_files(&mut self, files: &[(&str, &str)], message: &str) -> ObjectId {
        for (name, content) in files {
            self.write(name, content);
        }

        self.commit_all(message).await
    }

    pub async fn checkout(&mut self, branch: &str) {
        self.repository
            .checkout(branch, false)
            .await
            .expect("checkout to succeed");
        self.output.take();
    }

    pub async fn branch(&mut self, name: &str) -> ObjectId {
        let oid = self
            .repository
            .create_branch(name, None)
            .await
            .expect("branch to be created");
        self.output.take();

        oid
    }

    pub fn head_oid(&self) -> Option<ObjectId> {
        self.repository.refs().read_head().expect("HEAD to be readable")
    }
}

/// Downcast helper for asserting on the recognized failure states
pub fn repository_error(error: &anyhow::Error) -> &mygit::RepositoryError {
    error
        .downcast_ref::<mygit::RepositoryError>()
        .unwrap_or_else(|| panic!("expected a repository error, got {error:#}"))
}
